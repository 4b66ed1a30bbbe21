use crate::foundations::Content;

/// A single term/description pair.
#[derive(Debug, Clone)]
pub struct TermItem {
    pub term: Content,
    pub description: Content,
}

/// A description list, produced by grouping consecutive `terms.item`
/// elements.
#[derive(Debug, Clone, Default)]
pub struct TermsElem {
    pub tight: bool,
    pub children: Vec<Content>,
}

crate::elem!(TermItem, TermItem, "terms.item");
crate::elem!(TermsElem, Terms, "terms");
