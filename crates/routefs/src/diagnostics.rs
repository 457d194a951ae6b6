// File: src/diagnostics.rs
// Purpose: Non-fatal findings collected while compiling a route tree

use std::fmt;

use serde::Serialize;

/// What went wrong (or looked suspicious) for one route file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Malformed dynamic-segment syntax; the file was skipped
    InvalidSegment,
    /// The module could not be loaded; the file was skipped
    LoadFailed,
    /// The module loaded but binds no method and no wildcard; skipped
    NoHandlers,
    /// A method-named export is not callable; that export was ignored
    NonCallableExport,
    /// A method-named export is an empty sequence; that export was ignored
    EmptyChain,
    /// Two exports resolve to the same method; the later one was kept
    DuplicateMethod,
    /// Another file already produced this exact pattern; both are kept and
    /// the later registration wins
    DuplicatePattern,
}

impl DiagnosticKind {
    /// True when the file's route was left out of the result
    pub fn skips_route(self) -> bool {
        matches!(
            self,
            DiagnosticKind::InvalidSegment | DiagnosticKind::LoadFailed | DiagnosticKind::NoHandlers
        )
    }
}

/// A single non-fatal finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Root-relative path of the route file
    pub file: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: file.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}
