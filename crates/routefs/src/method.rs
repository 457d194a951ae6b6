// File: src/method.rs
// Purpose: HTTP method tokens recognized as route-module exports

use serde::Serialize;
use std::fmt;

/// HTTP method bound by a route module export.
///
/// Ordering follows declaration order so that a route's method table iterates
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Connect,
    Options,
    Trace,
    /// A token outside the standard set, accepted through configuration.
    /// Always stored lowercase.
    Extension(String),
}

impl Method {
    /// The nine tokens every compiler accepts
    pub const STANDARD: [Method; 9] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Head,
        Method::Connect,
        Method::Options,
        Method::Trace,
    ];

    /// Parses a token case-insensitively. Unknown tokens become `Extension`.
    pub fn parse(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "get" => Method::Get,
            "post" => Method::Post,
            "put" => Method::Put,
            "patch" => Method::Patch,
            "delete" => Method::Delete,
            "head" => Method::Head,
            "connect" => Method::Connect,
            "options" => Method::Options,
            "trace" => Method::Trace,
            other => Method::Extension(other.to_string()),
        }
    }

    /// Lowercase token, as written in route modules
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Connect => "connect",
            Method::Options => "options",
            Method::Trace => "trace",
            Method::Extension(token) => token,
        }
    }

    pub fn is_standard(&self) -> bool {
        !matches!(self, Method::Extension(_))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

/// The set of export names treated as method bindings
#[derive(Debug, Clone, Default)]
pub struct MethodAllowList {
    extra: Vec<Method>,
}

impl MethodAllowList {
    pub fn new<I, S>(additional: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra = additional
            .into_iter()
            .map(|token| Method::parse(token.as_ref()))
            .filter(|m| !m.is_standard())
            .collect();
        Self { extra }
    }

    /// Resolves an export name to a method if it is allowed
    pub fn resolve(&self, export_name: &str) -> Option<Method> {
        let method = Method::parse(export_name);
        if method.is_standard() || self.extra.contains(&method) {
            Some(method)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Method::parse("GET"), Method::Get);
        assert_eq!(Method::parse("Delete"), Method::Delete);
        assert_eq!(Method::parse("PROPFIND"), Method::Extension("propfind".into()));
    }

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::Extension("purge".into()).to_string(), "PURGE");
    }

    #[test]
    fn test_allow_list_rejects_unknown_exports() {
        let allow = MethodAllowList::default();
        assert_eq!(allow.resolve("post"), Some(Method::Post));
        assert_eq!(allow.resolve("userRegistry"), None);
        assert_eq!(allow.resolve("default"), None);
    }

    #[test]
    fn test_allow_list_accepts_configured_extensions() {
        let allow = MethodAllowList::new(["PropFind"]);
        assert_eq!(allow.resolve("propfind"), Some(Method::Extension("propfind".into())));
        assert_eq!(allow.resolve("purge"), None);
    }

    #[test]
    fn test_ordering_follows_declaration() {
        let mut methods = vec![Method::Trace, Method::Get, Method::Extension("a".into()), Method::Post];
        methods.sort();
        assert_eq!(methods[0], Method::Get);
        assert_eq!(methods[1], Method::Post);
        assert_eq!(methods[3], Method::Extension("a".into()));
    }
}
