//! The realization entry points dispatch on, and the shared types they
//! pass content and styles around as.

use std::cell::Cell;

use crate::foundations::{Content, StyleChain};
use crate::model::DocumentInfo;

/// Content paired with the style chain it should be realized under. Owned
/// rather than borrowed, since content here is an `Rc` handle and styles
/// are backed by `Rc`-shared link buffers; there is no arena lifetime to
/// track.
pub type Pair = (Content, StyleChain);

/// Whether a realized fragment should participate in inline or block flow,
/// decided by what its top-level content turned out to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Inline,
    Block,
}

/// The purpose a realization pass is being run for, which determines which
/// grouping rules apply and what the top-level wrapper around the result
/// looks like.
pub enum RealizationKind<'a> {
    /// Realizing a whole document: paragraphs, lists, and pages all group.
    /// `info` accumulates metadata observed from `set document(..)`.
    LayoutDocument { info: &'a Cell<DocumentInfo> },
    /// Realizing a fragment destined for layout outside of a full
    /// document (e.g. the body of a show-rule match): paragraphs and lists
    /// group, but no page breaks are honored. `kind_out` reports back
    /// whether the result ended up being inline or block content.
    LayoutFragment { kind_out: &'a Cell<Option<FragmentKind>> },
    /// Realizing the contents of a single paragraph: inline grouping rules
    /// (the textual pass, citation grouping) apply, but list/enum/terms
    /// and page grouping do not, since a paragraph cannot itself contain
    /// another paragraph.
    LayoutPar,
    /// Same as `LayoutDocument`, but for HTML export.
    HtmlDocument { info: &'a Cell<DocumentInfo> },
    /// Same as `LayoutFragment`, but for HTML export.
    HtmlFragment { kind_out: &'a Cell<Option<FragmentKind>> },
    /// Realizing math content: grouping rules for text flow (paragraphs,
    /// lists, citations) do not apply; only show rules and the space
    /// classifier's math-specific rules run.
    Math,
}

impl RealizationKind<'_> {
    /// Whether textual grouping rules (paragraphs, lists, citations, the
    /// regex pass) apply under this realization kind.
    pub fn grounds_text(&self) -> bool {
        !matches!(self, RealizationKind::Math)
    }

    /// Whether page-break grouping applies under this realization kind.
    pub fn is_document(&self) -> bool {
        matches!(
            self,
            RealizationKind::LayoutDocument { .. } | RealizationKind::HtmlDocument { .. }
        )
    }

    pub fn is_math(&self) -> bool {
        matches!(self, RealizationKind::Math)
    }
}
