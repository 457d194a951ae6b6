// File: src/registrar.rs
// Purpose: Bind resolved routes onto a host router, in priority order

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::binder::ResolvedRoute;
use crate::method::Method;
use crate::path::{decode_segment, normalize_path};

/// The router the compiled routes are bound onto.
///
/// Implement this for whatever serves requests. Bindings arrive in the
/// order they must be tried.
pub trait HostRouter<H> {
    /// Bind `chain` to one method on `pattern`
    fn route(&mut self, method: &Method, pattern: &str, chain: &[H]);

    /// Bind `chain` to every method on `pattern`.
    ///
    /// Called after the pattern's explicit methods, so a first-match router
    /// only falls through to it for methods not bound explicitly.
    fn any(&mut self, pattern: &str, chain: &[H]);
}

/// Registers `routes` onto `router` in the given order.
///
/// For each route, explicit method chains are bound first and the wildcard
/// chain (if any) last. Returns the number of bindings made.
pub fn register<H, R>(routes: &[ResolvedRoute<H>], router: &mut R) -> usize
where
    R: HostRouter<H> + ?Sized,
{
    let mut count = 0;

    for route in routes {
        for (method, chain) in &route.handlers_by_method {
            router.route(method, &route.url_pattern, chain);
            count += 1;
        }

        if let Some(chain) = &route.wildcard_handlers {
            router.any(&route.url_pattern, chain);
            count += 1;
        }
    }

    debug!("Registered {} bindings for {} routes", count, routes.len());
    count
}

/// Pattern component prepared for matching
#[derive(Debug, Clone, PartialEq, Eq)]
enum MatchSegment {
    Literal(String),
    Param(String),
    CatchAll(String),
}

fn parse_match_segments(pattern: &str) -> Vec<MatchSegment> {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|seg| match seg.chars().next() {
            Some(':') => MatchSegment::Param(seg[1..].to_string()),
            Some('*') => MatchSegment::CatchAll(seg[1..].to_string()),
            _ => MatchSegment::Literal(seg.to_string()),
        })
        .collect()
}

/// One (method, pattern) → chain entry of a [`RouteTable`]
#[derive(Debug, Clone)]
pub struct Binding<H> {
    /// `None` for a wildcard binding
    pub method: Option<Method>,
    pub pattern: String,
    pub chain: Vec<H>,
    segments: Vec<MatchSegment>,
}

/// Result of matching a request against a [`RouteTable`]
#[derive(Debug, Clone)]
pub struct RouteMatch<'a, H> {
    pub binding: &'a Binding<H>,
    /// Captured parameters, percent-decoded
    pub params: HashMap<String, String>,
}

/// In-memory host router.
///
/// Tries bindings in registration order and returns the first whose method
/// (or wildcard) and pattern both match. A wildcard is skipped for methods
/// its pattern binds explicitly. Registering the same method and pattern
/// twice replaces the earlier chain.
///
/// ```
/// use routefs::{Method, RouteTable};
/// use routefs::registrar::HostRouter;
///
/// let mut table = RouteTable::new();
/// table.route(&Method::Get, "/user/create", &["form"]);
/// table.route(&Method::Get, "/user/:id", &["show"]);
///
/// let hit = table.match_route(&Method::Get, "/user/42").unwrap();
/// assert_eq!(hit.binding.chain, vec!["show"]);
/// assert_eq!(hit.params["id"], "42");
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    bindings: Vec<Binding<H>>,
    case_insensitive: bool,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            case_insensitive: false,
        }
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal components compare case-insensitively
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Bindings in registration order
    pub fn bindings(&self) -> &[Binding<H>] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn bind(&mut self, method: Option<Method>, pattern: &str, chain: Vec<H>) {
        if let Some(existing) = self
            .bindings
            .iter_mut()
            .find(|b| b.method == method && b.pattern == pattern)
        {
            warn!(
                "Rebinding {} {}; the later chain replaces the earlier one",
                method.as_ref().map_or("*".to_string(), ToString::to_string),
                pattern
            );
            existing.chain = chain;
            return;
        }

        self.bindings.push(Binding {
            method,
            pattern: pattern.to_string(),
            segments: parse_match_segments(pattern),
            chain,
        });
    }

    /// True if `pattern` has a binding for exactly `method`
    fn binds_explicitly(&self, method: &Method, pattern: &str) -> bool {
        self.bindings
            .iter()
            .any(|b| b.method.as_ref() == Some(method) && b.pattern == pattern)
    }

    /// Finds the binding that serves `method` on `path`.
    ///
    /// A wildcard never serves a method that its own pattern binds
    /// explicitly, even when the explicit binding was registered later.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        let path = normalize_path(path);
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.bindings
            .iter()
            .filter(|b| match &b.method {
                Some(m) => m == method,
                None => !self.binds_explicitly(method, &b.pattern),
            })
            .find_map(|binding| {
                match_segments(
                    &binding.segments,
                    &path_segments,
                    HashMap::new(),
                    self.case_insensitive,
                )
                .map(|params| RouteMatch { binding, params })
            })
    }
}

/// Walks pattern and path segments together
fn match_segments(
    pattern: &[MatchSegment],
    path: &[&str],
    mut params: HashMap<String, String>,
    case_insensitive: bool,
) -> Option<HashMap<String, String>> {
    match (pattern.split_first(), path.split_first()) {
        (None, None) => Some(params),
        (None, Some(_)) => None,
        (Some((MatchSegment::CatchAll(name), _)), _) => {
            // Needs at least one component
            if path.is_empty() {
                return None;
            }
            let rest: Vec<String> = path.iter().map(|s| decode_segment(s).into_owned()).collect();
            params.insert(name.clone(), rest.join("/"));
            Some(params)
        }
        (Some(_), None) => None,
        (Some((MatchSegment::Param(name), pattern_rest)), Some((value, path_rest))) => {
            params.insert(name.clone(), decode_segment(value).into_owned());
            match_segments(pattern_rest, path_rest, params, case_insensitive)
        }
        (Some((MatchSegment::Literal(literal), pattern_rest)), Some((value, path_rest))) => {
            let value = decode_segment(value);
            let matches = if case_insensitive {
                literal.eq_ignore_ascii_case(&value)
            } else {
                *literal == *value
            };
            if matches {
                match_segments(pattern_rest, path_rest, params, case_insensitive)
            } else {
                None
            }
        }
    }
}

impl<H: Clone> HostRouter<H> for RouteTable<H> {
    fn route(&mut self, method: &Method, pattern: &str, chain: &[H]) {
        self.bind(Some(method.clone()), pattern, chain.to_vec());
    }

    fn any(&mut self, pattern: &str, chain: &[H]) {
        self.bind(None, pattern, chain.to_vec());
    }
}
