use ecow::EcoString;

use crate::foundations::Content;

/// A single citation reference.
#[derive(Debug, Clone)]
pub struct CiteElem {
    pub key: EcoString,
    pub supplement: Option<Content>,
}

/// Multiple adjacent citations grouped for combined rendering, e.g.
/// `@a @b @c` becoming `[1-3]`.
#[derive(Debug, Clone, Default)]
pub struct CiteGroup {
    pub children: Vec<Content>,
}

crate::elem!(CiteElem, Cite, "cite");
crate::elem!(CiteGroup, CiteGroup, "citation-group");
