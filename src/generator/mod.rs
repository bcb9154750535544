//! Generator module - assembles the output directory
//!
//! A build is a full rebuild: the output directory is wiped, static assets
//! and pages are copied verbatim, and every post is written as
//! `header ++ convert(markdown) ++ footer`.

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::{MarkdownConverter, Post, PostLoader};
use crate::templates::PostTemplate;
use crate::Site;

/// Summary of a completed build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Number of files copied from the asset directories
    pub assets_copied: usize,
    /// Number of static pages copied
    pub pages_copied: usize,
    /// Posts that were converted, in build order
    pub posts: Vec<Post>,
}

/// Static site generator
pub struct Generator<'a> {
    site: &'a Site,
    converter: &'a dyn MarkdownConverter,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(site: &'a Site, converter: &'a dyn MarkdownConverter) -> Self {
        Self { site, converter }
    }

    /// Generate the entire site
    ///
    /// The discovered post list is written to `out` before any post is converted.
    pub fn generate<W: Write>(&self, out: &mut W) -> Result<BuildReport> {
        // Validate the template before anything is deleted
        let template_path = self.site.template_path();
        let template = PostTemplate::load(&template_path, &self.site.config.template_marker)
            .with_context(|| format!("Invalid post template {:?}", template_path))?;

        self.reset_output()?;

        let assets_copied = self.copy_asset_dirs()?;
        let pages_copied = self.copy_static_pages()?;

        let posts = PostLoader::new(&self.site.post_source_dir, &self.site.config.post_extension)
            .load()?;
        let names: Vec<&str> = posts.iter().map(|p| p.file_name.as_str()).collect();
        tracing::info!("Found {} posts", posts.len());
        writeln!(out, "Posts: {:?}", names)?;
        out.flush()?;

        for post in &posts {
            let dest = self.write_post(post, &template)?;
            tracing::debug!("Generated: {:?}", dest);
        }

        Ok(BuildReport {
            assets_copied,
            pages_copied,
            posts,
        })
    }

    /// Remove the output directory and recreate it with an empty posts directory
    fn reset_output(&self) -> Result<()> {
        let output_dir = &self.site.output_dir;

        if output_dir.exists() {
            self.ensure_not_source(output_dir)?;
            fs::remove_dir_all(output_dir)
                .with_context(|| format!("Failed to delete {:?}", output_dir))?;
            tracing::info!("Deleted: {:?}", output_dir);
        }

        fs::create_dir_all(&self.site.posts_output_dir)
            .with_context(|| format!("Failed to create {:?}", self.site.posts_output_dir))?;

        Ok(())
    }

    /// Fail if deleting `output_dir` would also delete the site sources
    fn ensure_not_source(&self, output_dir: &Path) -> Result<()> {
        let output = output_dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve {:?}", output_dir))?;

        for protected in [&self.site.source_dir, &self.site.post_source_dir] {
            let Ok(protected) = protected.canonicalize() else {
                continue;
            };
            if protected.starts_with(&output) {
                bail!(
                    "Refusing to delete {:?}: it contains {:?}",
                    output_dir,
                    protected
                );
            }
        }

        Ok(())
    }

    /// Copy every configured asset directory into the output directory
    fn copy_asset_dirs(&self) -> Result<usize> {
        let mut copied = 0;

        for dir in &self.site.config.asset_dirs {
            let src = self.site.source_dir.join(dir);
            let dest = self.site.output_dir.join(dir);
            let count = copy_dir_recursive(&src, &dest)?;
            tracing::info!("Copied {} files from {:?}", count, src);
            copied += count;
        }

        Ok(copied)
    }

    /// Copy the static top-level pages byte for byte
    fn copy_static_pages(&self) -> Result<usize> {
        for page in &self.site.config.static_pages {
            let src = self.site.source_dir.join(page);
            let dest = self.site.output_dir.join(page);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&src, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", src, dest))?;
            tracing::debug!("Copied: {:?} -> {:?}", src, dest);
        }

        Ok(self.site.config.static_pages.len())
    }

    /// Convert one post and append header, body and footer to its page
    fn write_post(&self, post: &Post, template: &PostTemplate) -> Result<PathBuf> {
        let markdown = fs::read(&post.source)
            .with_context(|| format!("Failed to read {:?}", post.source))?;

        let body = self
            .converter
            .convert(&markdown)
            .with_context(|| {
                format!(
                    "Failed to convert {:?} with {}",
                    post.source,
                    self.converter.name()
                )
            })?;

        let dest = self
            .site
            .posts_output_dir
            .join(post.output_file_name(&self.site.config.output_extension));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&dest)
            .with_context(|| format!("Failed to open {:?}", dest))?;

        for part in [
            template.header().as_bytes(),
            body.as_slice(),
            template.footer().as_bytes(),
        ] {
            file.write_all(part)
                .with_context(|| format!("Failed to write {:?}", dest))?;
        }

        Ok(dest)
    }
}

/// Recursively copy `src` into `dest`, returning the number of files copied
///
/// Empty subdirectories are recreated; symlinks are followed.
fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        bail!("Asset directory not found: {:?}", src);
    }

    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", src))?;
        let path = entry.path();
        let relative = path.strip_prefix(src)?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {:?}", target))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, target))?;
            tracing::debug!("Copied: {:?} -> {:?}", path, target);
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{CommandConverter, ConvertError};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    /// Turns `# Title` into `<h1>Title</h1>` and leaves other text alone
    struct HeadingConverter;

    impl MarkdownConverter for HeadingConverter {
        fn name(&self) -> &str {
            "heading"
        }

        fn convert(&self, markdown: &[u8]) -> Result<Vec<u8>, ConvertError> {
            Ok(match markdown.strip_prefix(b"# ") {
                Some(title) => [&b"<h1>"[..], title.trim_ascii_end(), &b"</h1>"[..]].concat(),
                None => markdown.to_vec(),
            })
        }
    }

    struct FailingConverter;

    impl MarkdownConverter for FailingConverter {
        fn name(&self) -> &str {
            "failing"
        }

        fn convert(&self, _markdown: &[u8]) -> Result<Vec<u8>, ConvertError> {
            Err(ConvertError::Io {
                program: "failing".to_string(),
                source: std::io::Error::other("renderer crashed"),
            })
        }
    }

    fn write(base: &Path, relative: &str, contents: &[u8]) {
        let path = base.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Lay out a minimal site with the standard directory structure
    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        write(base, "source/images/logo.png", &[0x89, b'P', b'N', b'G', 0, 0xff]);
        write(base, "source/images/photos/cat.jpg", b"meow");
        fs::create_dir_all(base.join("source/images/empty")).unwrap();
        write(base, "source/style/main.css", b"body { margin: 0; }");
        write(base, "source/sourcecode/part1.c", b"int main(void) { return 0; }\n");
        write(base, "source/index.html", b"<h1>Home</h1>");
        write(base, "source/projects.html", b"<h1>Projects</h1>");
        write(base, "source/post_template.html", b"<html>@content</html>");
        dir
    }

    fn build(base: &Path) -> Result<BuildReport> {
        let site = Site::with_config(base, SiteConfig::default());
        Generator::new(&site, &HeadingConverter).generate(&mut std::io::sink())
    }

    /// Map of relative path to contents for every file under `root`
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(root)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
                (relative, fs::read(e.path()).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_post_is_wrapped_in_template() {
        let dir = fixture();
        write(dir.path(), "hello.md", b"# Hi");

        let report = build(dir.path()).unwrap();
        assert_eq!(report.posts.len(), 1);

        let html = fs::read_to_string(dir.path().join("generated/posts/hello.html")).unwrap();
        assert_eq!(html, "<html><h1>Hi</h1></html>");
    }

    #[test]
    fn test_assets_and_pages_are_copied_verbatim() {
        let dir = fixture();
        let base = dir.path();

        let report = build(base).unwrap();
        assert_eq!(report.assets_copied, 4);
        assert_eq!(report.pages_copied, 2);

        for tree in ["images", "style", "sourcecode"] {
            assert_eq!(
                snapshot(&base.join("source").join(tree)),
                snapshot(&base.join("generated").join(tree))
            );
        }
        assert!(base.join("generated/images/empty").is_dir());

        for page in ["index.html", "projects.html"] {
            assert_eq!(
                fs::read(base.join("source").join(page)).unwrap(),
                fs::read(base.join("generated").join(page)).unwrap()
            );
        }
    }

    #[test]
    fn test_no_posts_leaves_empty_posts_dir() {
        let dir = fixture();
        let report = build(dir.path()).unwrap();

        assert!(report.posts.is_empty());
        let posts_dir = dir.path().join("generated/posts");
        assert!(posts_dir.is_dir());
        assert_eq!(fs::read_dir(&posts_dir).unwrap().count(), 0);
        assert!(dir.path().join("generated/index.html").exists());
    }

    #[test]
    fn test_stale_output_is_removed() {
        let dir = fixture();
        let base = dir.path();
        write(base, "old.md", b"# Old");
        build(base).unwrap();
        assert!(base.join("generated/posts/old.html").exists());

        fs::remove_file(base.join("old.md")).unwrap();
        write(base, "generated/leftover.txt", b"stale");
        build(base).unwrap();

        assert!(!base.join("generated/posts/old.html").exists());
        assert!(!base.join("generated/leftover.txt").exists());
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let dir = fixture();
        let base = dir.path();
        write(base, "a.md", b"# A");
        write(base, "b.md", b"plain text");

        build(base).unwrap();
        let first = snapshot(&base.join("generated"));
        build(base).unwrap();
        let second = snapshot(&base.join("generated"));

        assert_eq!(first, second);
        assert_eq!(
            first.get(Path::new("posts/b.html")).unwrap(),
            b"<html>plain text</html>"
        );
    }

    #[test]
    fn test_missing_asset_dir_aborts() {
        let dir = fixture();
        fs::remove_dir_all(dir.path().join("source/style")).unwrap();
        assert!(build(dir.path()).is_err());
    }

    #[test]
    fn test_missing_static_page_aborts() {
        let dir = fixture();
        fs::remove_file(dir.path().join("source/projects.html")).unwrap();
        assert!(build(dir.path()).is_err());
    }

    #[test]
    fn test_bad_template_aborts_before_touching_output() {
        let dir = fixture();
        let base = dir.path();
        write(base, "source/post_template.html", b"<html>@content@content</html>");
        write(base, "generated/keep.txt", b"previous build");

        assert!(build(base).is_err());
        assert!(base.join("generated/keep.txt").exists());
    }

    #[test]
    fn test_converter_failure_aborts() {
        let dir = fixture();
        write(dir.path(), "hello.md", b"# Hi");

        let site = Site::with_config(dir.path(), SiteConfig::default());
        let mut out = Vec::new();
        let err = Generator::new(&site, &FailingConverter)
            .generate(&mut out)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("hello.md"));

        // The post list still reaches the user before the failing conversion
        assert_eq!(String::from_utf8(out).unwrap(), "Posts: [\"hello.md\"]\n");
    }

    #[test]
    fn test_post_list_is_reported() {
        let dir = fixture();
        write(dir.path(), "b.md", b"# B");
        write(dir.path(), "a.md", b"# A");

        let site = Site::with_config(dir.path(), SiteConfig::default());
        let mut out = Vec::new();
        Generator::new(&site, &HeadingConverter)
            .generate(&mut out)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Posts: [\"a.md\", \"b.md\"]\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_post_is_passed_through() {
        let dir = fixture();
        write(dir.path(), "cafe.md", b"# Caf\xe9\n");

        let site = Site::with_config(dir.path(), SiteConfig::default());
        let converter = CommandConverter::new("cat", Vec::new());
        Generator::new(&site, &converter)
            .generate(&mut std::io::sink())
            .unwrap();

        let html = fs::read(dir.path().join("generated/posts/cafe.html")).unwrap();
        assert_eq!(html, b"<html># Caf\xe9\n</html>");
    }

    #[test]
    fn test_refuses_to_delete_sources() {
        let dir = fixture();
        let config = SiteConfig {
            output_dir: ".".to_string(),
            ..SiteConfig::default()
        };
        let site = Site::with_config(dir.path(), config);

        assert!(Generator::new(&site, &HeadingConverter)
            .generate(&mut std::io::sink())
            .is_err());
        assert!(dir.path().join("source/index.html").exists());
    }

    #[test]
    fn test_refuses_to_delete_sources_through_parent_dir() {
        let dir = fixture();
        let config = SiteConfig {
            output_dir: "source/..".to_string(),
            ..SiteConfig::default()
        };
        let site = Site::with_config(dir.path(), config);

        let err = Generator::new(&site, &HeadingConverter)
            .generate(&mut std::io::sink())
            .unwrap_err();
        assert!(err.to_string().contains("Refusing to delete"));
        assert!(dir.path().join("source/index.html").exists());
        assert!(dir.path().join("source/post_template.html").exists());
    }

    #[test]
    fn test_custom_post_source_dir() {
        let dir = fixture();
        write(dir.path(), "blog/first.md", b"# First");
        let config = SiteConfig {
            post_source_dir: "blog".to_string(),
            ..SiteConfig::default()
        };
        let site = Site::with_config(dir.path(), config);

        Generator::new(&site, &HeadingConverter)
            .generate(&mut std::io::sink())
            .unwrap();
        let html = fs::read_to_string(dir.path().join("generated/posts/first.html")).unwrap();
        assert_eq!(html, "<html><h1>First</h1></html>");
    }
}
