// File: src/compiler.rs
// Purpose: Walk → translate → rank → bind, in one synchronous pass

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::binder::{ModuleBinder, ResolvedRoute};
use crate::config::RouterConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::CompileError;
use crate::method::MethodAllowList;
use crate::module::ModuleLoader;
use crate::registrar::{register, HostRouter};
use crate::route::{rank, translate, FileFilter, RoutePattern};
use crate::walker::{walk_tree, DiscoveredFile};

/// Output of one compile: routes in registration order plus every
/// non-fatal finding
#[derive(Debug, Clone)]
pub struct Compilation<H> {
    /// Sorted by descending specificity, ties in discovery order
    pub routes: Vec<ResolvedRoute<H>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<H> Compilation<H> {
    /// Binds every route onto `router` in order; returns the binding count
    pub fn register<R>(&self, router: &mut R) -> usize
    where
        R: HostRouter<H> + ?Sized,
    {
        register(&self.routes, router)
    }

    /// True if any file was skipped
    pub fn has_skipped_files(&self) -> bool {
        self.diagnostics.iter().any(|d| d.kind.skips_route())
    }
}

/// Compiles a route directory into ordered, bound routes.
///
/// Holds its configuration and module loader explicitly; compiling twice
/// over an unchanged tree yields identical output.
///
/// ```no_run
/// use routefs::{RouteCompiler, RouteTable, RouterConfig, SourceScanLoader};
///
/// let compiler = RouteCompiler::new(RouterConfig::new("routes"), SourceScanLoader::new());
/// let compilation = compiler.compile()?;
///
/// let mut table = RouteTable::new();
/// compilation.register(&mut table);
/// # Ok::<(), routefs::CompileError>(())
/// ```
#[derive(Debug)]
pub struct RouteCompiler<L> {
    config: RouterConfig,
    loader: L,
}

impl<L: ModuleLoader> RouteCompiler<L> {
    pub fn new(config: RouterConfig, loader: L) -> Self {
        Self { config, loader }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Runs the full pipeline.
    ///
    /// Fails only when the root directory cannot be walked. Malformed file
    /// names and modules that fail to load are reported in
    /// [`Compilation::diagnostics`] and left out of the routes.
    pub fn compile(&self) -> Result<Compilation<L::Handler>, CompileError> {
        let files = walk_tree(&self.config.directory)?;
        let mut diagnostics = Vec::new();

        let patterns = self.translate_all(&files, &mut diagnostics);
        note_duplicate_patterns(&patterns, &mut diagnostics);

        let ranked = rank(patterns);

        let binder = ModuleBinder::new(
            &self.loader,
            MethodAllowList::new(&self.config.additional_methods),
        );
        let routes: Vec<_> = ranked
            .into_iter()
            .filter_map(|pattern| binder.bind(pattern, &mut diagnostics))
            .collect();

        info!(
            "Compiled {} routes from {} files under {:?} ({} diagnostics)",
            routes.len(),
            files.len(),
            self.config.directory,
            diagnostics.len()
        );

        Ok(Compilation {
            routes,
            diagnostics,
        })
    }

    /// Compiles and registers onto `router` in one call.
    ///
    /// Returns the diagnostics of the compile.
    pub fn mount<R>(&self, router: &mut R) -> Result<Vec<Diagnostic>, CompileError>
    where
        R: HostRouter<L::Handler> + ?Sized,
    {
        let compilation = self.compile()?;
        let count = compilation.register(router);
        debug!("Registered {} bindings", count);
        Ok(compilation.diagnostics)
    }

    fn translate_all(
        &self,
        files: &[DiscoveredFile],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<RoutePattern> {
        let filter = FileFilter::from_config(&self.config);

        files
            .iter()
            .filter_map(|file| match translate(file, &filter) {
                Ok(pattern) => pattern,
                Err(e) => {
                    let source = file.relative_path();
                    warn!("Skipping {}: {}", source, e);
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::InvalidSegment,
                        source,
                        e.to_string(),
                    ));
                    None
                }
            })
            .collect()
    }
}

/// Reports files that normalize to a pattern an earlier file already produced
fn note_duplicate_patterns(patterns: &[RoutePattern], diagnostics: &mut Vec<Diagnostic>) {
    let mut first_seen: HashMap<&str, String> = HashMap::new();

    for pattern in patterns {
        let source = pattern.source_file.relative_path();
        match first_seen.get(pattern.url_pattern.as_str()) {
            Some(first) => {
                warn!(
                    "{} and {} both map to {}; the later registration wins",
                    first, source, pattern.url_pattern
                );
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicatePattern,
                    &source,
                    format!("pattern {} is also produced by {}", pattern.url_pattern, first),
                ));
            }
            None => {
                first_seen.insert(&pattern.url_pattern, source);
            }
        }
    }
}
