/// Segment classification for file-based route patterns
///
/// Pure functions: same input, same output, no side effects.
use std::borrow::Cow;

use crate::error::TranslateError;
use crate::path::decode_segment;

/// One component of a file path, as the router sees it
///
/// # Examples
///
/// ```
/// use routefs::route::pattern::{classify_segment, SegmentKind};
///
/// assert_eq!(classify_segment("about").unwrap(), SegmentKind::Static("about".into()));
/// assert_eq!(classify_segment("[id]").unwrap(), SegmentKind::Dynamic("id".into()));
/// assert_eq!(classify_segment("[...slug]").unwrap(), SegmentKind::CatchAll("slug".into()));
/// assert_eq!(classify_segment("Index").unwrap(), SegmentKind::Index);
/// assert!(classify_segment("[id").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind<'a> {
    /// `index`: contributes nothing, the parent directory's own route
    Index,
    /// Literal text, percent-decoded
    Static(Cow<'a, str>),
    /// `[name]`: captures exactly one component
    Dynamic(&'a str),
    /// `[...name]`: captures one or more trailing components
    CatchAll(&'a str),
}

/// Classifies a single path segment (extension already stripped)
///
/// # Rules (evaluated in order)
///
/// 1. `index`, any case → [`SegmentKind::Index`]
/// 2. `[...name]` → [`SegmentKind::CatchAll`]
/// 3. `[name]` → [`SegmentKind::Dynamic`]
/// 4. any other bracket usage → [`TranslateError::MalformedSegment`]
/// 5. anything else → [`SegmentKind::Static`], unless the decoded text
///    contains `/` or starts with `:` or `*` ([`TranslateError::ReservedLiteral`])
pub fn classify_segment(segment: &str) -> Result<SegmentKind<'_>, TranslateError> {
    if segment.eq_ignore_ascii_case("index") {
        return Ok(SegmentKind::Index);
    }

    match segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => {
            if inner.contains(['[', ']']) {
                return Err(TranslateError::MalformedSegment(segment.to_string()));
            }

            let (name, catch_all) = match inner.strip_prefix("...") {
                Some(name) => (name, true),
                None => (inner, false),
            };

            if name.trim().is_empty() {
                return Err(TranslateError::EmptyParameter(segment.to_string()));
            }

            Ok(if catch_all {
                SegmentKind::CatchAll(name)
            } else {
                SegmentKind::Dynamic(name)
            })
        }
        None if segment.contains(['[', ']']) => {
            Err(TranslateError::MalformedSegment(segment.to_string()))
        }
        None => {
            let text = decode_segment(segment);
            // Would read back as a separator, a parameter or a catch-all
            if text.contains('/') || text.starts_with([':', '*']) {
                return Err(TranslateError::ReservedLiteral(segment.to_string()));
            }
            Ok(SegmentKind::Static(text))
        }
    }
}
