//! Content loader - discovers markdown posts

use anyhow::{anyhow, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::Post;

/// Discovers posts among the direct children of a directory
pub struct PostLoader {
    dir: PathBuf,
    extension: String,
}

impl PostLoader {
    /// Create a loader for `dir`, matching files whose extension is exactly `extension`
    pub fn new<P: AsRef<Path>>(dir: P, extension: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extension: extension.to_string(),
        }
    }

    /// Load all posts, sorted by file name
    pub fn load(&self) -> Result<Vec<Post>> {
        if !self.dir.is_dir() {
            return Err(anyhow!("Post directory not found: {:?}", self.dir));
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.dir, e);
                    continue;
                }
            };
            let path = entry.path();

            if !entry.file_type().is_file() || !self.is_post_file(path) {
                continue;
            }

            match Post::from_path(path) {
                Some(post) => posts.push(post),
                None => tracing::warn!("Skipping post with non UTF-8 name: {:?}", path),
            }
        }

        Ok(posts)
    }

    fn is_post_file(&self, path: &Path) -> bool {
        path.extension() == Some(OsStr::new(&self.extension))
    }
}
