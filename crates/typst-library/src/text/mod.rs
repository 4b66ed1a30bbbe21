//! Inline textual elements.

use ecow::EcoString;

/// A run of text, the atomic unit the textual regex pass operates over.
#[derive(Debug, Clone, Default)]
pub struct TextElem {
    pub text: EcoString,
}

impl TextElem {
    pub fn new(text: impl Into<EcoString>) -> Self {
        Self { text: text.into() }
    }
}

/// A space between words.
///
/// `had_newline` records whether the space in source text spanned a line
/// break, which some show rules condition on even though a space is
/// otherwise a single classifier state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceElem {
    pub had_newline: bool,
}

/// An explicit line break (`\`), as opposed to a collapsed space.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinebreakElem {
    pub justify: bool,
}

/// A smart quote, which may be rewritten to a curly quote depending on
/// surrounding context.
#[derive(Debug, Clone, Copy)]
pub struct SmartQuoteElem {
    pub double: bool,
}

/// Bold emphasis of its child content.
#[derive(Debug, Clone)]
pub struct StrongElem {
    pub body: crate::foundations::Content,
}

/// Italic emphasis of its child content.
#[derive(Debug, Clone)]
pub struct EmphElem {
    pub body: crate::foundations::Content,
}

/// Preformatted text, either as an inline span or a standalone block.
#[derive(Debug, Clone)]
pub struct RawElem {
    pub text: EcoString,
    pub lang: Option<EcoString>,
    pub block: bool,
}

/// A named symbol reference (`sym.arrow.r`), rewritten to plain text
/// outside of math content during the kind-specific visit pass.
#[derive(Debug, Clone)]
pub struct SymbolElem {
    pub text: EcoString,
}

crate::elem!(TextElem, Text, "text");
crate::elem!(SpaceElem, Space, "space");
crate::elem!(LinebreakElem, Linebreak, "linebreak");
crate::elem!(SmartQuoteElem, SmartQuote, "smartquote");
crate::elem!(StrongElem, Strong, "strong");
crate::elem!(EmphElem, Emph, "emph");
crate::elem!(RawElem, Raw, "raw");
crate::elem!(SymbolElem, Symbol, "symbol");
