// File: src/module/registry.rs
// Purpose: Compiled symbol table of route modules keyed by relative path

use std::collections::HashMap;
use std::fmt;

use anyhow::anyhow;

use super::{ModuleExports, ModuleLoader};
use crate::walker::DiscoveredFile;

type Factory<H> = Box<dyn Fn() -> anyhow::Result<ModuleExports<H>> + Send + Sync>;

/// Route modules registered ahead of time, looked up by the root-relative
/// path of the file that declares the route (`api/user/[id].ts`).
///
/// Each entry is a factory run once per compile, so a module whose
/// initialization fails surfaces as a load error for that file only.
///
/// ```
/// use routefs::module::{ModuleExports, StaticRegistry};
///
/// let registry = StaticRegistry::new()
///     .with_module("user/index.ts", ModuleExports::new().with_handler("get", "list_users"))
///     .with_factory("user/[id].ts", || Ok(ModuleExports::new().with_handler("get", "get_user")));
///
/// assert_eq!(registry.len(), 2);
/// ```
pub struct StaticRegistry<H> {
    modules: HashMap<String, Factory<H>>,
}

impl<H> Default for StaticRegistry<H> {
    fn default() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }
}

impl<H> fmt::Debug for StaticRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.modules.keys().collect();
        keys.sort();
        f.debug_struct("StaticRegistry").field("modules", &keys).finish()
    }
}

fn registry_key(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_string()
}

impl<H: 'static> StaticRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for the module at `path`
    pub fn with_factory<F>(mut self, path: impl AsRef<str>, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<ModuleExports<H>> + Send + Sync + 'static,
    {
        self.modules
            .insert(registry_key(path.as_ref()), Box::new(factory));
        self
    }

    /// Registers a fixed export map for the module at `path`
    pub fn with_module(self, path: impl AsRef<str>, exports: ModuleExports<H>) -> Self
    where
        H: Clone + Send + Sync,
    {
        self.with_factory(path, move || Ok(exports.clone()))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(&registry_key(path))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<H: Clone> ModuleLoader for StaticRegistry<H> {
    type Handler = H;

    fn load(&self, file: &DiscoveredFile) -> anyhow::Result<ModuleExports<H>> {
        let key = file.relative_path();
        let factory = self
            .modules
            .get(&key)
            .ok_or_else(|| anyhow!("no module registered for {}", key))?;
        factory()
    }
}
