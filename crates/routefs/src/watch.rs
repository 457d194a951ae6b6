// File: src/watch.rs
// Purpose: Recompilation trigger for a route directory

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::broadcast;
use tracing::{error, info};

use crate::config::RouterConfig;

/// What happened to a route file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    Renamed,
}

/// A change under the route directory that warrants a recompile
#[derive(Debug, Clone)]
pub struct RouteChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Watches the route directory and broadcasts changes to route files.
///
/// The compiler is not re-run here; subscribers decide when to call
/// [`crate::RouteCompiler::compile`] again.
pub struct RouteWatcher {
    tx: broadcast::Sender<RouteChange>,
    _watcher: notify::RecommendedWatcher,
}

fn has_route_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Whether a change to `path` can alter the compiled routes.
///
/// Removals and renames pass regardless of extension: the path may be a
/// directory full of route files that no longer exists to inspect.
fn affects_routes(kind: ChangeKind, path: &Path, extensions: &[String]) -> bool {
    match kind {
        ChangeKind::Removed | ChangeKind::Renamed => true,
        ChangeKind::Created if path.is_dir() => true,
        _ => has_route_extension(path, extensions),
    }
}

impl RouteWatcher {
    /// Starts watching `config.directory` recursively
    pub fn new(config: &RouterConfig) -> Result<Self> {
        let (tx, _) = broadcast::channel(100);
        let tx_clone = tx.clone();
        let extensions = config.extensions.clone();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    let kind = match event.kind {
                        EventKind::Create(_) => ChangeKind::Created,
                        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
                        EventKind::Modify(_) => ChangeKind::Modified,
                        EventKind::Remove(_) => ChangeKind::Removed,
                        _ => return,
                    };

                    for path in event.paths {
                        if !affects_routes(kind, &path, &extensions) {
                            continue;
                        }

                        info!("Route file changed: {:?} ({:?})", path, kind);

                        // No subscribers is fine
                        let _ = tx_clone.send(RouteChange { path, kind });
                    }
                }
                Err(e) => error!("Watch error: {:?}", e),
            }
        })?;

        watcher.watch(&config.directory, RecursiveMode::Recursive)?;
        info!("Watching: {:?}", config.directory);

        Ok(Self {
            tx,
            _watcher: watcher,
        })
    }

    /// Subscribe to route file changes
    pub fn subscribe(&self) -> broadcast::Receiver<RouteChange> {
        self.tx.subscribe()
    }
}
