// File: src/walker.rs
// Purpose: Enumerates route files under the root directory

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::CompileError;

/// A non-directory entry found under the route root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// File name including extension, e.g. `[id].ts`
    pub file_name: String,
    /// Absolute or root-joined directory holding the file
    pub containing_directory: PathBuf,
    /// Directory names between the root and the file, then the file name
    pub relative_segments: Vec<String>,
}

impl DiscoveredFile {
    /// Full path on disk
    pub fn path(&self) -> PathBuf {
        self.containing_directory.join(&self.file_name)
    }

    /// Root-relative path with `/` separators, e.g. `api/user/[id].ts`.
    ///
    /// This is the key route modules are registered under.
    pub fn relative_path(&self) -> String {
        self.relative_segments.join("/")
    }

    /// Directory segments only (file name excluded)
    pub fn directories(&self) -> &[String] {
        let len = self.relative_segments.len();
        &self.relative_segments[..len.saturating_sub(1)]
    }
}

/// Walks `root` depth-first in lexical order and returns every file.
///
/// Entries within a directory are visited sorted by file name, so two walks
/// over an unchanged tree yield the same sequence. A missing root, or any
/// unreadable directory beneath it, fails the walk.
pub fn walk_tree(root: &Path) -> Result<Vec<DiscoveredFile>, CompileError> {
    if !root.exists() {
        return Err(CompileError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CompileError::RootNotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            CompileError::Walk { path, source }
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative_segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let containing_directory = path.parent().unwrap_or(root).to_path_buf();

        files.push(DiscoveredFile {
            file_name,
            containing_directory,
            relative_segments,
        });
    }

    debug!("Discovered {} files under {:?}", files.len(), root);
    Ok(files)
}
