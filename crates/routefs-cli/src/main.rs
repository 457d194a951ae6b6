mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "routefs")]
#[command(version, about = "Inspect and check file-system route trees", long_about = None)]
struct Cli {
    /// Log compiler progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the route tree and its settings come from
#[derive(Args, Clone)]
pub struct TreeArgs {
    /// Route directory (overrides the config file)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Config file (default: routefs.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra method token to accept as a handler export, repeatable
    #[arg(short, long = "method", value_name = "METHOD")]
    methods: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compiled routes in registration order
    Routes {
        #[command(flatten)]
        tree: TreeArgs,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compile and fail if any file produced a diagnostic
    Check {
        #[command(flatten)]
        tree: TreeArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Recompile whenever a route file changes
    Watch {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Show which binding would serve a request
    Match {
        #[command(flatten)]
        tree: TreeArgs,

        /// Request method, e.g. GET
        method: String,

        /// Request path, e.g. /user/42
        path: String,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "routefs=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Routes { tree, json } => {
            commands::routes::execute(&tree, json)?;
        }
        Commands::Check { tree, json } => {
            if !commands::check::execute(&tree, json)? {
                std::process::exit(1);
            }
        }
        Commands::Watch { tree } => {
            commands::watch::execute(&tree)?;
        }
        Commands::Match { tree, method, path } => {
            if !commands::matching::execute(&tree, &method, &path)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
