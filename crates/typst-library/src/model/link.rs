use ecow::EcoString;

use crate::foundations::Content;

/// A hyperlink wrapping its visible body.
#[derive(Debug, Clone)]
pub struct LinkElem {
    pub dest: EcoString,
    pub body: Content,
}

crate::elem!(LinkElem, Link, "link");
