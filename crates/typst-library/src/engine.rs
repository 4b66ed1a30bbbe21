//! The shared context threaded through realization: diagnostics sink and
//! recursion-depth bookkeeping.

use ecow::{EcoVec, eco_vec};
use typst_syntax::FileId;

use crate::diag::{SourceDiagnostic, SourceResult};
use crate::foundations::{Content, Value};

/// Caps the number of warnings, delayed errors, and traced values a single
/// [`Sink`] accumulates, so a pathological recipe can't grow diagnostics
/// without bound.
const MAX_SINK_ENTRIES: usize = 10;

/// Collects diagnostics and other side-channel output produced while
/// realizing content.
#[derive(Debug, Default)]
pub struct Sink {
    warnings: EcoVec<SourceDiagnostic>,
    delayed: EcoVec<SourceDiagnostic>,
    traced: EcoVec<Value>,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, diagnostic: SourceDiagnostic) {
        if self.warnings.len() < MAX_SINK_ENTRIES {
            self.warnings.push(diagnostic);
        }
    }

    pub fn delay(&mut self, diagnostic: SourceDiagnostic) {
        if self.delayed.len() < MAX_SINK_ENTRIES {
            self.delayed.push(diagnostic);
        }
    }

    pub fn trace(&mut self, value: Value) {
        if self.traced.len() < MAX_SINK_ENTRIES {
            self.traced.push(value);
        }
    }

    pub fn warnings(&self) -> &[SourceDiagnostic] {
        &self.warnings
    }

    pub fn delayed(&mut self) -> EcoVec<SourceDiagnostic> {
        std::mem::take(&mut self.delayed)
    }
}

/// A single show-rule application may recurse at most this many times
/// before realization gives up and reports an error, guarding against a
/// recipe whose output always matches its own selector.
pub const MAX_SHOW_RULE_DEPTH: usize = 64;

/// Tracks recursion depth across nested show rules, and the stack of files
/// currently being processed (to detect cycles through `include`).
///
/// Unlike the original, which threads a borrowed, singly-linked route
/// through recursive calls to avoid growing an allocation per recursion
/// level, this just keeps an owned stack: realization here is not on a hot
/// enough path (single-threaded, uncached) for that micro-optimization to
/// matter, and an owned `Route` is much easier to carry around.
#[derive(Debug, Clone, Default)]
pub struct Route {
    files: Vec<FileId>,
    show_rule_depth: usize,
}

impl Route {
    pub fn root(file: Option<FileId>) -> Self {
        Self { files: file.into_iter().collect(), show_rule_depth: 0 }
    }

    pub fn enter_show_rule(&mut self) {
        self.show_rule_depth += 1;
    }

    pub fn exit_show_rule(&mut self) {
        self.show_rule_depth -= 1;
    }

    pub fn show_rule_depth(&self) -> usize {
        self.show_rule_depth
    }

    /// Whether `file` is already being processed somewhere up the route,
    /// i.e. entering it now would form a cycle.
    pub fn contains(&self, file: FileId) -> bool {
        self.files.contains(&file)
    }
}

/// Diagnostics produced that should be surfaced even if the overall
/// operation otherwise fails, alongside the live sink.
pub fn empty_diagnostics() -> EcoVec<SourceDiagnostic> {
    eco_vec![]
}

/// The shared context threaded through realization.
#[derive(Debug, Default)]
pub struct Engine {
    pub sink: Sink,
    pub route: Route,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a fallible show-rule/built-in-rule application, recording its
    /// error (if any) as a delayed diagnostic and continuing with empty
    /// content, matching how the realizer tolerates a single bad recipe
    /// without aborting the whole realization.
    pub fn delay(&mut self, result: SourceResult<Content>) -> Content {
        match result {
            Ok(content) => content,
            Err(diagnostics) => {
                for diagnostic in diagnostics {
                    self.sink.delay(diagnostic);
                }
                Content::empty()
            }
        }
    }
}
