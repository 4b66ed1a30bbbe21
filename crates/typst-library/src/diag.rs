//! Diagnostics produced while realizing content.

use ecow::{eco_vec, EcoString, EcoVec};
use typst_syntax::Span;

/// The result type for any fallible realization step.
pub type SourceResult<T> = Result<T, EcoVec<SourceDiagnostic>>;

/// The importance of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single error or warning, with the call trace that produced it and any
/// hints on how to resolve it.
#[derive(Debug, Clone)]
pub struct SourceDiagnostic {
    pub severity: Severity,
    pub span: Span,
    pub message: EcoString,
    pub trace: EcoVec<(Span, EcoString)>,
    pub hints: EcoVec<EcoString>,
}

impl SourceDiagnostic {
    pub fn error(span: Span, message: impl Into<EcoString>) -> Self {
        Self {
            severity: Severity::Error,
            span,
            message: message.into(),
            trace: eco_vec![],
            hints: eco_vec![],
        }
    }

    pub fn warning(span: Span, message: impl Into<EcoString>) -> Self {
        Self {
            severity: Severity::Warning,
            span,
            message: message.into(),
            trace: eco_vec![],
            hints: eco_vec![],
        }
    }

    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

/// Constructs an `Err(..)` of a single [`SourceDiagnostic`].
///
/// ```ignore
/// bail!(span, "thing went wrong");
/// bail!(span, "thing went wrong: {value}");
/// bail!(span, "thing went wrong"; hint: "try this instead");
/// ```
#[macro_export]
macro_rules! bail {
    ($span:expr, $fmt:literal $(, $arg:expr)* $(; hint: $hint:literal $(, $hint_arg:expr)*)?) => {
        return std::result::Result::Err(ecow::eco_vec![
            $crate::diag::SourceDiagnostic::error($span, format!($fmt $(, $arg)*))
            $(.with_hint(format!($hint $(, $hint_arg)*)))?
        ])
    };
}
