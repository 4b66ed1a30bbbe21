use std::num::NonZeroU64;

use crate::FileId;

/// A unique identifier locating the piece of markup that produced a value or
/// content element.
///
/// Spans are attached to [`Property`](typst_library::foundations::Property)
/// and [`Recipe`](typst_library::foundations::Recipe) entries, to content
/// elements, and to diagnostics, so that errors and introspection results can
/// be traced back to source. A detached span means "no known origin" and is
/// always valid to construct.
///
/// This type takes up 8 bytes and is null-optimized (`Option<Span>` also
/// takes 8 bytes).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span(NonZeroU64);

impl Span {
    /// The value reserved for the detached span.
    const DETACHED: u64 = 1;

    /// Data layout: | 16 bits file id | 48 bits number |.
    const BITS: usize = 48;

    /// Create a span pointing at `number` within `file`.
    pub fn new(file: FileId, number: u64) -> Self {
        let raw = file.into_raw();
        let bits = ((raw as u64) << Self::BITS) | (number & ((1 << Self::BITS) - 1));
        Self(NonZeroU64::new(bits.max(2)).unwrap())
    }

    /// The id of the file this span points into, if not detached.
    pub fn id(self) -> Option<FileId> {
        if self.is_detached() {
            return None;
        }
        let raw = (self.0.get() >> Self::BITS) as u16;
        Some(FileId::from_raw(raw))
    }

    /// Create a span that does not point into any source.
    pub const fn detached() -> Self {
        match NonZeroU64::new(Self::DETACHED) {
            Some(v) => Self(v),
            None => unreachable!(),
        }
    }

    /// Whether the span is detached.
    pub const fn is_detached(self) -> bool {
        self.0.get() == Self::DETACHED
    }

    /// Return `other` if `self` is detached and `self` otherwise.
    pub fn or(self, other: Self) -> Self {
        if self.is_detached() { other } else { self }
    }

    /// Find the first non-detached span in the iterator.
    pub fn find(iter: impl IntoIterator<Item = Self>) -> Self {
        iter.into_iter().find(|span| !span.is_detached()).unwrap_or(Span::detached())
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::detached()
    }
}
