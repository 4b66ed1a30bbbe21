use crate::foundations::{Content, Label};

/// A cross-reference to a labelled element.
#[derive(Debug, Clone)]
pub struct RefElem {
    pub target: Label,
    pub supplement: Option<Content>,
}

crate::elem!(RefElem, Ref, "ref");
