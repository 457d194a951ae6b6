/// Route module for file-based routing
///
/// Pure components that turn discovered files into ranked route patterns:
/// - `pattern`: classify one path segment
/// - `parser`: filter files and translate paths to patterns
/// - `priority`: score and order patterns by specificity
pub mod parser;
pub mod pattern;
pub mod priority;

pub use parser::{translate, FileFilter, IgnoreReason, PatternSegment, RoutePattern};
pub use pattern::{classify_segment, SegmentKind};
pub use priority::{calculate_priority, rank};
