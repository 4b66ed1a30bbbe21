use crate::foundations::Content;

/// A single numbered list item.
#[derive(Debug, Clone)]
pub struct EnumItem {
    pub number: Option<usize>,
    pub body: Content,
}

/// A numbered list, produced by grouping consecutive `enum.item` elements.
#[derive(Debug, Clone, Default)]
pub struct EnumElem {
    pub tight: bool,
    pub children: Vec<Content>,
}

crate::elem!(EnumItem, EnumItem, "enum.item");
crate::elem!(EnumElem, Enum, "enum");
