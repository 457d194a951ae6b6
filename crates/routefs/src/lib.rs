//! # routefs
//!
//! A file-system route compiler. Point it at a directory of route modules
//! and it produces an ordered list of HTTP bindings:
//! - Static routes (`users/create.ts` → `/users/create`)
//! - Index routes (`orders/index.ts` → `/orders`)
//! - Dynamic parameters (`users/[id].ts` → `/users/:id`)
//! - Catch-all routes (`docs/[...slug].ts` → `/docs/*slug`)
//! - Private files and folders (`_internal/helpers.ts` → ignored)
//!
//! ## Pipeline
//!
//! Each stage produces a new value; nothing is mutated in place.
//!
//! 1. [`walker`]: depth-first, lexical enumeration of files under the root
//! 2. [`route::parser`]: filtering and path-to-pattern translation
//! 3. [`route::priority`]: specificity scoring, most specific first
//! 4. [`binder`]: module loading and handler-chain extraction per method
//! 5. [`registrar`]: binding onto a [`HostRouter`] in that order
//!
//! ## Errors
//!
//! A missing or unreadable root fails the compile with [`CompileError`].
//! Everything else (malformed `[...]` syntax, modules that fail to load) is
//! reported as a [`Diagnostic`] and only that file's route is skipped.
//!
//! ## Example
//!
//! ```
//! use routefs::{Method, ModuleExports, RouteCompiler, RouteTable, RouterConfig, StaticRegistry};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::create_dir_all(dir.path().join("user")).unwrap();
//! std::fs::write(dir.path().join("user/create.ts"), "").unwrap();
//! std::fs::write(dir.path().join("user/[id].ts"), "").unwrap();
//!
//! let registry = StaticRegistry::new()
//!     .with_module("user/create.ts", ModuleExports::new().with_handler("post", "create_user"))
//!     .with_module("user/[id].ts", ModuleExports::new().with_handler("get", "get_user"));
//!
//! let compiler = RouteCompiler::new(RouterConfig::new(dir.path()), registry);
//! let compilation = compiler.compile().unwrap();
//!
//! let patterns: Vec<&str> = compilation.routes.iter().map(|r| r.url_pattern.as_str()).collect();
//! assert_eq!(patterns, vec!["/user/create", "/user/:id"]);
//!
//! let mut table = RouteTable::new();
//! compilation.register(&mut table);
//! let hit = table.match_route(&Method::Get, "/user/42").unwrap();
//! assert_eq!(hit.binding.chain, vec!["get_user"]);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod binder;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod method;
pub mod module;
pub mod path;
pub mod registrar;
pub mod route;
pub mod walker;
pub mod watch;

// Re-export public types
pub use binder::{ModuleBinder, ResolvedRoute};
pub use compiler::{Compilation, RouteCompiler};
pub use config::RouterConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{CompileError, TranslateError};
pub use method::{Method, MethodAllowList};
pub use module::{Export, HandlerRef, ModuleExports, ModuleLoader, SourceScanLoader, StaticRegistry};
pub use registrar::{register, HostRouter, RouteMatch, RouteTable};
pub use route::{PatternSegment, RoutePattern};
pub use walker::{walk_tree, DiscoveredFile};
pub use watch::{ChangeKind, RouteChange, RouteWatcher};
