// File: src/config.rs
// Purpose: Compiler configuration parsing from routefs.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration file layout
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub routing: RouterConfig,
}

/// Inputs to the route compiler.
///
/// Constructed explicitly and passed by reference; nothing here is global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Root directory holding route files (default: "routes")
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Source-module extensions, leading dot included
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File-name suffixes that never produce a route (type declarations, tests)
    #[serde(default = "default_non_route_suffixes")]
    pub non_route_suffixes: Vec<String>,

    /// Segments starting with this character are private to the tree
    #[serde(default = "default_ignore_prefix")]
    pub ignore_prefix: char,

    /// Method tokens accepted on top of the nine standard ones
    #[serde(default)]
    pub additional_methods: Vec<String>,
}

fn default_directory() -> PathBuf {
    PathBuf::from("routes")
}

fn default_extensions() -> Vec<String> {
    [".ts", ".js", ".mjs", ".tsx", ".jsx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_non_route_suffixes() -> Vec<String> {
    vec![".d.ts".to_string(), ".test.ts".to_string()]
}

fn default_ignore_prefix() -> char {
    '_'
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            extensions: default_extensions(),
            non_route_suffixes: default_non_route_suffixes(),
            ignore_prefix: default_ignore_prefix(),
            additional_methods: Vec::new(),
        }
    }
}

impl RouterConfig {
    /// Default configuration rooted at `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Load the `[routing]` table from a TOML file.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(file.routing)
    }

    /// Load configuration from default path (./routefs.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("routefs.toml")
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_non_route_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_route_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore_prefix(mut self, prefix: char) -> Self {
        self.ignore_prefix = prefix;
        self
    }

    /// Accept an extra method token (e.g. `propfind`)
    pub fn with_additional_method(mut self, method: impl Into<String>) -> Self {
        self.additional_methods.push(method.into());
        self
    }
}
