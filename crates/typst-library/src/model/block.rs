use crate::foundations::Content;

/// An explicit block-level container, interrupting any paragraph or list
/// currently being grouped around it.
#[derive(Debug, Clone)]
pub struct BlockElem {
    pub body: Content,
}

crate::elem!(BlockElem, Block, "block");
