// File: src/binder.rs
// Purpose: Loads route modules and extracts handler chains per method

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::method::{Method, MethodAllowList};
use crate::module::{Export, ModuleExports, ModuleLoader};
use crate::route::RoutePattern;

/// A route pattern bound to its handler chains
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute<H> {
    /// URL pattern like `/users/:id`
    pub url_pattern: String,
    /// Specificity score (higher is tried first)
    pub priority: u64,
    /// Parameter names in order of appearance
    pub params: Vec<String>,
    /// Root-relative path of the route file
    pub source: String,
    /// Explicit chains, one per bound method
    pub handlers_by_method: BTreeMap<Method, Vec<H>>,
    /// Fallback chain for every method not bound explicitly
    pub wildcard_handlers: Option<Vec<H>>,
}

impl<H> ResolvedRoute<H> {
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.handlers_by_method.keys()
    }

    /// The chain that serves `method` on this pattern, explicit first,
    /// then the wildcard
    pub fn chain_for(&self, method: &Method) -> Option<&[H]> {
        self.handlers_by_method
            .get(method)
            .or(self.wildcard_handlers.as_ref())
            .map(Vec::as_slice)
    }
}

/// Turns ranked patterns into resolved routes by loading their modules
pub struct ModuleBinder<'a, L> {
    loader: &'a L,
    allow: MethodAllowList,
}

impl<'a, L: ModuleLoader> ModuleBinder<'a, L> {
    pub fn new(loader: &'a L, allow: MethodAllowList) -> Self {
        Self { loader, allow }
    }

    /// Loads the module behind `pattern` and extracts its chains.
    ///
    /// Returns `None` when the module fails to load or binds nothing; the
    /// reason is pushed onto `diagnostics`.
    pub fn bind(
        &self,
        pattern: RoutePattern,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<ResolvedRoute<L::Handler>> {
        let source = pattern.source_file.relative_path();

        let exports = match self.loader.load(&pattern.source_file) {
            Ok(exports) => exports,
            Err(e) => {
                warn!("Failed to load route module {}: {:#}", source, e);
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::LoadFailed,
                    &source,
                    format!("{:#}", e),
                ));
                return None;
            }
        };

        let handlers_by_method = self.method_chains(&exports, &source, diagnostics);
        let wildcard_handlers = wildcard_chain(&exports, &source, diagnostics);

        if handlers_by_method.is_empty() && wildcard_handlers.is_none() {
            warn!("Route module {} exports no handlers", source);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::NoHandlers,
                &source,
                "module exports no method handlers and no default handler",
            ));
            return None;
        }

        debug!(
            "Bound {} -> {} ({} methods, wildcard: {})",
            pattern.url_pattern,
            source,
            handlers_by_method.len(),
            wildcard_handlers.is_some()
        );

        Some(ResolvedRoute {
            url_pattern: pattern.url_pattern,
            priority: pattern.priority,
            params: pattern.params,
            source,
            handlers_by_method,
            wildcard_handlers,
        })
    }

    fn method_chains(
        &self,
        exports: &ModuleExports<L::Handler>,
        source: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> BTreeMap<Method, Vec<L::Handler>> {
        let mut chains = BTreeMap::new();

        for (name, export) in exports.exports() {
            let Some(method) = self.allow.resolve(name) else {
                continue;
            };

            let Some(chain) = export.as_chain() else {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::NonCallableExport,
                    source,
                    format!("export `{}` is not a handler or handler sequence", name),
                ));
                continue;
            };

            if chain.is_empty() {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::EmptyChain,
                    source,
                    format!("export `{}` is an empty handler sequence", name),
                ));
                continue;
            }

            if chains.insert(method.clone(), chain).is_some() {
                warn!("{} binds {} more than once; keeping the last", source, method);
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateMethod,
                    source,
                    format!("method {} is exported more than once; `{}` wins", method, name),
                ));
            }
        }

        chains
    }
}

/// Resolves the default export to a wildcard chain.
///
/// A callable default is used directly. A non-callable default that carries
/// its own callable `default` is resolved one level deeper.
fn wildcard_chain<H: Clone>(
    exports: &ModuleExports<H>,
    source: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Vec<H>> {
    let default = exports.default_export()?;

    let chain = default.as_chain().or_else(|| match default {
        Export::Object(inner) => inner.default_export().and_then(Export::as_chain),
        _ => None,
    });

    match chain {
        Some(chain) if !chain.is_empty() => Some(chain),
        Some(_) => {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::EmptyChain,
                source,
                "default export is an empty handler sequence",
            ));
            None
        }
        None => {
            debug!("Default export of {} is not callable; no wildcard", source);
            None
        }
    }
}
