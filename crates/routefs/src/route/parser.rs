/// File filtering and path-to-pattern translation
///
/// Turns a [`DiscoveredFile`] into a [`RoutePattern`] or explains why it
/// does not participate in routing.
use std::path::Path;

use tracing::debug;

use super::pattern::{classify_segment, SegmentKind};
use crate::config::RouterConfig;
use crate::error::TranslateError;
use crate::walker::DiscoveredFile;

/// One component of a translated pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Literal(String),
    Param(String),
    CatchAll(String),
}

/// A translated route, before its module is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    /// URL pattern like `/users/:id` or `/docs/*slug`
    pub url_pattern: String,
    /// Components of `url_pattern`, in order
    pub segments: Vec<PatternSegment>,
    /// Parameter names, in order of appearance
    pub params: Vec<String>,
    /// Specificity score, assigned by [`super::priority::rank`]
    pub priority: u64,
    pub source_file: DiscoveredFile,
}

/// Why a file was left out of routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnrecognizedExtension,
    NonRouteSuffix,
    PrivateSegment,
}

/// Filtering rules derived from [`RouterConfig`]
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    non_route_suffixes: Vec<String>,
    ignore_prefix: char,
}

impl FileFilter {
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            non_route_suffixes: config
                .non_route_suffixes
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            ignore_prefix: config.ignore_prefix,
        }
    }

    /// Returns the reason `file` is excluded, or `None` if it is a route file
    pub fn ignore_reason(&self, file: &DiscoveredFile) -> Option<IgnoreReason> {
        let extension = file_extension(&file.file_name);
        if !extension.is_some_and(|ext| self.extensions.iter().any(|e| e == ext)) {
            return Some(IgnoreReason::UnrecognizedExtension);
        }

        let lower = file.file_name.to_lowercase();
        if self.non_route_suffixes.iter().any(|s| lower.ends_with(s)) {
            return Some(IgnoreReason::NonRouteSuffix);
        }

        let private = file
            .directories()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(file_stem(&file.file_name)))
            .any(|segment| segment.starts_with(self.ignore_prefix));
        if private {
            return Some(IgnoreReason::PrivateSegment);
        }

        None
    }
}

/// `.ts` for `users.ts`, `None` for `Makefile` or `.env`
fn file_extension(file_name: &str) -> Option<&str> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    Some(&file_name[file_name.len() - ext.len() - 1..])
}

/// File name minus its last extension
fn file_stem(file_name: &str) -> &str {
    match file_extension(file_name) {
        Some(ext) => &file_name[..file_name.len() - ext.len()],
        None => file_name,
    }
}

/// Accumulator for the fold over path segments
#[derive(Default)]
struct ParseState {
    pattern: String,
    segments: Vec<PatternSegment>,
    params: Vec<String>,
}

impl ParseState {
    fn with_static_segment(mut self, segment: &str) -> Self {
        self.pattern.push('/');
        self.pattern.push_str(segment);
        self.segments.push(PatternSegment::Literal(segment.to_string()));
        self
    }

    fn with_param(mut self, name: &str) -> Result<Self, TranslateError> {
        self.claim_param(name)?;
        self.pattern.push_str("/:");
        self.pattern.push_str(name);
        self.segments.push(PatternSegment::Param(name.to_string()));
        Ok(self)
    }

    fn with_catch_all(mut self, name: &str) -> Result<Self, TranslateError> {
        self.claim_param(name)?;
        self.pattern.push_str("/*");
        self.pattern.push_str(name);
        self.segments.push(PatternSegment::CatchAll(name.to_string()));
        Ok(self)
    }

    fn claim_param(&mut self, name: &str) -> Result<(), TranslateError> {
        if self.params.iter().any(|p| p == name) {
            return Err(TranslateError::DuplicateParameter(name.to_string()));
        }
        self.params.push(name.to_string());
        Ok(())
    }

    fn ends_with_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(PatternSegment::CatchAll(_)))
    }

    fn finalize(mut self) -> Self {
        if self.pattern.is_empty() {
            self.pattern = "/".to_string();
        }
        self
    }
}

fn process_segment(state: ParseState, segment: &str) -> Result<ParseState, TranslateError> {
    let kind = classify_segment(segment)?;

    // Anything following a catch-all would be unreachable
    if state.ends_with_catch_all() && kind != SegmentKind::Index {
        if let Some(PatternSegment::CatchAll(name)) = state.segments.last() {
            return Err(TranslateError::CatchAllNotLast(format!("[...{}]", name)));
        }
    }

    match kind {
        SegmentKind::Index => Ok(state),
        SegmentKind::Static(text) => Ok(state.with_static_segment(&text)),
        SegmentKind::Dynamic(name) => state.with_param(name),
        SegmentKind::CatchAll(name) => state.with_catch_all(name),
    }
}

/// Translates a root-relative path (directories then stem) into pattern parts.
///
/// # Examples
///
/// ```
/// use routefs::route::parser::parse_pattern;
///
/// let (pattern, _, params) = parse_pattern(["user", "[id]"]).unwrap();
/// assert_eq!(pattern, "/user/:id");
/// assert_eq!(params, vec!["id".to_string()]);
///
/// let (pattern, _, _) = parse_pattern(["orders", "index"]).unwrap();
/// assert_eq!(pattern, "/orders");
///
/// let (pattern, _, _) = parse_pattern(["docs", "[...slug]"]).unwrap();
/// assert_eq!(pattern, "/docs/*slug");
/// ```
pub fn parse_pattern<'a, I>(
    segments: I,
) -> Result<(String, Vec<PatternSegment>, Vec<String>), TranslateError>
where
    I: IntoIterator<Item = &'a str>,
{
    let state = segments
        .into_iter()
        .try_fold(ParseState::default(), process_segment)?
        .finalize();

    Ok((state.pattern, state.segments, state.params))
}

/// Translates `file` into a route pattern.
///
/// Returns `Ok(None)` when the filter excludes the file, and an error when
/// the file name uses malformed dynamic-segment syntax.
pub fn translate(
    file: &DiscoveredFile,
    filter: &FileFilter,
) -> Result<Option<RoutePattern>, TranslateError> {
    if let Some(reason) = filter.ignore_reason(file) {
        debug!("Ignoring {} ({:?})", file.relative_path(), reason);
        return Ok(None);
    }

    let segments = file
        .directories()
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(file_stem(&file.file_name)));

    let (url_pattern, segments, params) = parse_pattern(segments)?;

    Ok(Some(RoutePattern {
        url_pattern,
        segments,
        params,
        priority: 0,
        source_file: file.clone(),
    }))
}
