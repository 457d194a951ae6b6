// File: src/error.rs
// Purpose: Error types for route compilation

use std::path::PathBuf;

/// Fatal errors that abort a compile.
///
/// A broken root directory means nothing can be served, so these surface to
/// the caller of [`crate::RouteCompiler::compile`] instead of becoming
/// diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("route directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("route directory is not a directory: {}", .0.display())]
    RootNotADirectory(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-file translation errors.
///
/// The offending file is skipped and the error is reported as a
/// [`crate::Diagnostic`]; the rest of the tree still compiles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("malformed segment `{0}`: unbalanced or misplaced brackets")]
    MalformedSegment(String),

    #[error("segment `{0}` declares an empty parameter name")]
    EmptyParameter(String),

    #[error("parameter `{0}` appears more than once in the same pattern")]
    DuplicateParameter(String),

    #[error("catch-all segment `{0}` must be the last segment")]
    CatchAllNotLast(String),

    #[error("segment `{0}` decodes to `/` or a leading `:`/`*` and cannot be a literal")]
    ReservedLiteral(String),
}
