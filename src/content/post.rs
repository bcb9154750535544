//! Post model

use std::path::{Path, PathBuf};

/// A markdown post discovered in the post source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Base name without extension
    pub name: String,

    /// Source file name as it appears in the directory listing
    pub file_name: String,

    /// Full source file path
    pub source: PathBuf,
}

impl Post {
    /// Create a post from a source path, if it has a usable file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_stem()?.to_str()?.to_string();
        let file_name = path.file_name()?.to_str()?.to_string();
        Some(Self {
            name,
            file_name,
            source: path.to_path_buf(),
        })
    }

    /// File name of the generated page, e.g. `hello.md` -> `hello.html`
    pub fn output_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.name, extension)
    }
}
