use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use routefs::{Compilation, HandlerRef, ResolvedRoute};
use serde::Serialize;

use super::{compiler, describe_chain, print_diagnostics};
use crate::TreeArgs;

/// One registration, as printed
#[derive(Serialize)]
struct BindingView<'a> {
    method: String,
    pattern: &'a str,
    priority: u64,
    source: &'a str,
    chain: &'a [HandlerRef],
}

fn bindings(routes: &[ResolvedRoute<HandlerRef>]) -> Vec<BindingView<'_>> {
    let mut views = Vec::new();

    for route in routes {
        for (method, chain) in &route.handlers_by_method {
            views.push(BindingView {
                method: method.to_string(),
                pattern: &route.url_pattern,
                priority: route.priority,
                source: &route.source,
                chain,
            });
        }
        if let Some(chain) = &route.wildcard_handlers {
            views.push(BindingView {
                method: "*".to_string(),
                pattern: &route.url_pattern,
                priority: route.priority,
                source: &route.source,
                chain,
            });
        }
    }

    views
}

pub fn execute(tree: &TreeArgs, json: bool) -> Result<()> {
    let compiler = compiler(tree)?;
    let compilation = compiler.compile()?;

    if json {
        let output = serde_json::json!({
            "routes": bindings(&compilation.routes),
            "diagnostics": compilation.diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_table(&compiler.config().directory, &compilation);
    Ok(())
}

/// Prints bindings in registration order, then any diagnostics
pub fn print_table(directory: &Path, compilation: &Compilation<HandlerRef>) {
    let views = bindings(&compilation.routes);

    println!(
        "{} {}",
        "Routes in".green().bold(),
        directory.display().to_string().cyan()
    );
    println!();

    if views.is_empty() {
        println!("{}", "No routes found".yellow());
    }

    let width = views.iter().map(|v| v.pattern.len()).max().unwrap_or(0);
    for view in &views {
        println!(
            "  {:>20}  {:<7} {:<width$}  {}  {}",
            view.priority.to_string().dimmed(),
            view.method.bold(),
            view.pattern,
            view.source.dimmed(),
            describe_chain(view.chain),
            width = width
        );
    }

    if !compilation.diagnostics.is_empty() {
        println!();
        print_diagnostics(&compilation.diagnostics);
    }
}
