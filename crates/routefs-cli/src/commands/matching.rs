use anyhow::Result;
use colored::Colorize;
use routefs::{Method, RouteTable};

use super::{compiler, describe_chain};
use crate::TreeArgs;

/// Returns false when nothing serves the request
pub fn execute(tree: &TreeArgs, method: &str, path: &str) -> Result<bool> {
    let compilation = compiler(tree)?.compile()?;

    let mut table = RouteTable::new();
    compilation.register(&mut table);

    let method = Method::parse(method);
    let Some(hit) = table.match_route(&method, path) else {
        println!("{} no binding serves {} {}", "✗".red().bold(), method, path);
        return Ok(false);
    };

    let bound = hit
        .binding
        .method
        .as_ref()
        .map_or_else(|| "*".to_string(), ToString::to_string);
    println!(
        "{} {} {} → {} {}",
        "✓".green().bold(),
        method,
        path,
        bound.bold(),
        hit.binding.pattern.cyan()
    );

    let mut params: Vec<_> = hit.params.iter().collect();
    params.sort();
    for (name, value) in params {
        println!("    {} = {}", name.dimmed(), value);
    }
    println!("    {}", describe_chain(&hit.binding.chain));

    Ok(true)
}
