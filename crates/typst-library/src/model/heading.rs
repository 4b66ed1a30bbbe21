use crate::foundations::Content;

/// A section heading at a given nesting depth.
#[derive(Debug, Clone)]
pub struct HeadingElem {
    pub depth: std::num::NonZeroU8,
    pub body: Content,
}

crate::elem!(HeadingElem, Heading, "heading");
