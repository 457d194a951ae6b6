use anyhow::Result;
use colored::Colorize;

use super::{compiler, print_diagnostics};
use crate::TreeArgs;

/// Returns false when any diagnostic was produced
pub fn execute(tree: &TreeArgs, json: bool) -> Result<bool> {
    let compilation = compiler(tree)?.compile()?;
    let clean = compilation.diagnostics.is_empty();

    if json {
        println!("{}", serde_json::to_string_pretty(&compilation.diagnostics)?);
        return Ok(clean);
    }

    if clean {
        println!(
            "{} {} routes, no diagnostics",
            "✓".green().bold(),
            compilation.routes.len()
        );
    } else {
        print_diagnostics(&compilation.diagnostics);
        println!();
        println!(
            "{} {} diagnostics ({} routes compiled)",
            "✗".red().bold(),
            compilation.diagnostics.len(),
            compilation.routes.len()
        );
    }

    Ok(clean)
}
