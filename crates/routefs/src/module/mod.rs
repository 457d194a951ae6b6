/// Route modules: what a route file exports, and how it gets loaded
///
/// The compiler never materializes modules itself. It asks a
/// [`ModuleLoader`] for the export map of each route file and works from
/// that. Two loaders ship with the crate:
/// - [`StaticRegistry`]: a compiled symbol table keyed by relative path
/// - [`SourceScanLoader`]: reads export declarations out of source text
use crate::walker::DiscoveredFile;

pub mod registry;
pub mod scan;

pub use registry::StaticRegistry;
pub use scan::{HandlerRef, SourceScanLoader};

/// A single exported binding
#[derive(Debug, Clone, PartialEq)]
pub enum Export<H> {
    /// One callable
    Handler(H),
    /// An ordered sequence of callables, e.g. middleware then controller
    Chain(Vec<H>),
    /// A non-callable object that may carry its own `default`
    Object(ModuleExports<H>),
    /// Anything else (numbers, strings, registries, ...)
    Value,
}

impl<H: Clone> Export<H> {
    /// The handler chain this export stands for, if it is callable
    pub fn as_chain(&self) -> Option<Vec<H>> {
        match self {
            Export::Handler(handler) => Some(vec![handler.clone()]),
            Export::Chain(chain) => Some(chain.clone()),
            Export::Object(_) | Export::Value => None,
        }
    }
}

/// Export map of one route module, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleExports<H> {
    named: Vec<(String, Export<H>)>,
    default: Option<Box<Export<H>>>,
}

impl<H> Default for ModuleExports<H> {
    fn default() -> Self {
        Self {
            named: Vec::new(),
            default: None,
        }
    }
}

impl<H> ModuleExports<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named export
    pub fn with_export(mut self, name: impl Into<String>, export: Export<H>) -> Self {
        self.named.push((name.into(), export));
        self
    }

    /// Shorthand for a named single-handler export
    pub fn with_handler(self, name: impl Into<String>, handler: H) -> Self {
        self.with_export(name, Export::Handler(handler))
    }

    /// Shorthand for a named chain export
    pub fn with_chain<I>(self, name: impl Into<String>, chain: I) -> Self
    where
        I: IntoIterator<Item = H>,
    {
        self.with_export(name, Export::Chain(chain.into_iter().collect()))
    }

    /// Sets the default export
    pub fn with_default(mut self, export: Export<H>) -> Self {
        self.default = Some(Box::new(export));
        self
    }

    /// Named exports in declaration order
    pub fn exports(&self) -> impl Iterator<Item = (&str, &Export<H>)> {
        self.named.iter().map(|(name, export)| (name.as_str(), export))
    }

    pub fn default_export(&self) -> Option<&Export<H>> {
        self.default.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.default.is_none()
    }
}

/// Materializes route modules for the compiler.
///
/// `load` is called once per route file, eagerly, before anything is
/// registered. An `Err` excludes that file's route and is reported as a
/// diagnostic; it never aborts the compile.
pub trait ModuleLoader {
    type Handler: Clone;

    fn load(&self, file: &DiscoveredFile) -> anyhow::Result<ModuleExports<Self::Handler>>;
}

impl<L: ModuleLoader + ?Sized> ModuleLoader for &L {
    type Handler = L::Handler;

    fn load(&self, file: &DiscoveredFile) -> anyhow::Result<ModuleExports<Self::Handler>> {
        (**self).load(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_as_chain() {
        assert_eq!(Export::Handler(1).as_chain(), Some(vec![1]));
        assert_eq!(Export::Chain(vec![1, 2]).as_chain(), Some(vec![1, 2]));
        assert_eq!(Export::<i32>::Value.as_chain(), None);
        assert_eq!(Export::Object(ModuleExports::<i32>::new()).as_chain(), None);
    }

    #[test]
    fn test_exports_keep_declaration_order() {
        let module = ModuleExports::new()
            .with_handler("post", 1)
            .with_export("schema", Export::Value)
            .with_chain("get", [2, 3]);

        let names: Vec<&str> = module.exports().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["post", "schema", "get"]);
        assert!(module.default_export().is_none());
    }

    #[test]
    fn test_default_export() {
        let module = ModuleExports::new().with_default(Export::Handler(7));
        assert!(!module.is_empty());
        assert_eq!(module.default_export(), Some(&Export::Handler(7)));
    }
}
