use crate::foundations::Content;

/// A single bulleted list item, grouped together with its siblings into a
/// [`ListElem`] by the list grouping rule.
#[derive(Debug, Clone)]
pub struct ListItem {
    pub body: Content,
}

/// A bulleted list, produced by grouping consecutive `list.item` elements
/// (and the supportive spaces between them).
#[derive(Debug, Clone, Default)]
pub struct ListElem {
    pub tight: bool,
    pub children: Vec<Content>,
}

crate::elem!(ListItem, ListItem, "list.item");
crate::elem!(ListElem, List, "list");
