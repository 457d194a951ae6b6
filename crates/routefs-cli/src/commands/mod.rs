pub mod check;
pub mod matching;
pub mod routes;
pub mod watch;

use anyhow::Result;
use routefs::{Diagnostic, HandlerRef, RouteCompiler, RouterConfig, SourceScanLoader};

use crate::TreeArgs;

/// Resolves the compiler configuration from flags and the config file
pub fn load_config(tree: &TreeArgs) -> Result<RouterConfig> {
    let mut config = match &tree.config {
        Some(path) => RouterConfig::load(path)?,
        None => RouterConfig::load_default()?,
    };

    if let Some(dir) = &tree.dir {
        config = config.with_directory(dir);
    }

    for method in &tree.methods {
        config = config.with_additional_method(method);
    }

    Ok(config)
}

pub fn compiler(tree: &TreeArgs) -> Result<RouteCompiler<SourceScanLoader>> {
    Ok(RouteCompiler::new(load_config(tree)?, SourceScanLoader::new()))
}

/// Chain as `a → b → c`, using each handler's source expression
pub fn describe_chain(chain: &[HandlerRef]) -> String {
    chain
        .iter()
        .map(|h| h.expr.as_str())
        .collect::<Vec<_>>()
        .join(" → ")
}

pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    use colored::Colorize;

    for diagnostic in diagnostics {
        let label = if diagnostic.kind.skips_route() {
            "skipped".red().bold()
        } else {
            "warning".yellow().bold()
        };
        println!("{} {}", label, diagnostic);
    }
}
