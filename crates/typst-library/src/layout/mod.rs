//! Layout-adjacent elements that realization classifies and groups but does
//! not itself lay out.

use crate::foundations::{Content, Fraction, Length, Ratio};

/// The amount of spacing, either a fixed length or a fraction of the
/// remaining space on the line/page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spacing {
    Length(Length),
    Fr(Fraction),
}

impl Spacing {
    pub fn is_fractional(&self) -> bool {
        matches!(self, Spacing::Fr(_))
    }
}

/// Horizontal spacing, either fixed-amount or a fraction of remaining
/// space. `weak` spaces are destructive: they vanish at the start/end of a
/// line or when adjacent to another space, per the space classifier.
#[derive(Debug, Clone, Copy)]
pub struct HElem {
    pub amount: Spacing,
    pub weak: bool,
}

/// Vertical spacing between block-level content. `attach` mirrors the
/// original's notion of spacing that sticks to the block above or below it
/// rather than always being symmetric.
#[derive(Debug, Clone, Copy)]
pub struct VElem {
    pub amount: Spacing,
    pub weak: bool,
    pub attach: bool,
}

/// An explicit or automatic page break.
#[derive(Debug, Clone, Copy, Default)]
pub struct PagebreakElem {
    pub weak: bool,
    pub boundary: bool,
}

/// A page, set up via a `set page(..)` rule observed while visiting the
/// document's top level.
#[derive(Debug, Clone, Default)]
pub struct PageElem {
    pub children: Vec<Content>,
}

/// An inline-level sized container.
#[derive(Debug, Clone)]
pub struct BoxElem {
    pub body: Content,
}

/// Forces its content to participate in inline flow even if it would
/// otherwise be block-level.
#[derive(Debug, Clone)]
pub struct InlineElem {
    pub body: Content,
}

/// Alignment of its child content within the available area.
#[derive(Debug, Clone)]
pub struct AlignElem {
    pub body: Content,
    pub x: Option<Ratio>,
    pub y: Option<Ratio>,
}

crate::elem!(HElem, HSpace, "h");
crate::elem!(VElem, VSpace, "v");
crate::elem!(PagebreakElem, Pagebreak, "pagebreak");
crate::elem!(PageElem, Page, "page");
crate::elem!(BoxElem, Box, "box");
crate::elem!(InlineElem, Inline, "inline");
crate::elem!(AlignElem, Align, "align");
