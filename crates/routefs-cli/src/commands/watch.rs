use anyhow::Result;
use colored::Colorize;
use routefs::RouteWatcher;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use super::compiler;
use super::routes::print_table;
use crate::TreeArgs;

pub fn execute(tree: &TreeArgs) -> Result<()> {
    let compiler = compiler(tree)?;
    let watcher = RouteWatcher::new(compiler.config())?;
    let mut rx = watcher.subscribe();

    let report = || match compiler.compile() {
        Ok(compilation) => print_table(&compiler.config().directory, &compilation),
        Err(e) => println!("{} {}", "Error:".red().bold(), e),
    };

    report();
    println!("{}", "Watching for changes (Ctrl+C to stop)".dimmed());

    loop {
        match rx.blocking_recv() {
            Ok(change) => {
                println!();
                println!("{:?} {}", change.kind, change.path.display());
                report();
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Missed {} change events; recompiling", skipped);
                report();
            }
            Err(RecvError::Closed) => break,
        }
    }

    Ok(())
}
