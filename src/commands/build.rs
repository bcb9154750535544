//! Build the site

use anyhow::Result;
use std::io::Write;

use crate::content::MarkdownConverter;
use crate::generator::{BuildReport, Generator};
use crate::Site;

/// Rebuild the output directory from scratch
pub fn run<W: Write>(
    site: &Site,
    converter: &dyn MarkdownConverter,
    out: &mut W,
) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    tracing::info!(
        "Building {:?} into {:?} (converter: {})",
        site.base_dir,
        site.output_dir,
        converter.name()
    );

    let report = Generator::new(site, converter).generate(out)?;

    tracing::info!(
        "Copied {} asset files and {} pages, generated {} posts in {:?}",
        report.assets_copied,
        report.pages_copied,
        report.posts.len(),
        start.elapsed()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MarkdownRenderer;
    use std::fs;
    use std::path::Path;

    fn fixture(base: &Path) {
        for tree in ["images", "style", "sourcecode"] {
            fs::create_dir_all(base.join("source").join(tree)).unwrap();
        }
        fs::write(base.join("source/style/site.css"), "h1 { color: red; }").unwrap();
        fs::write(base.join("source/index.html"), "home").unwrap();
        fs::write(base.join("source/projects.html"), "projects").unwrap();
        fs::write(base.join("source/post_template.html"), "<body>@content</body>").unwrap();
    }

    #[test]
    fn test_run_builds_posts_and_reports_them() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        fs::write(dir.path().join("first.md"), "*hello*").unwrap();

        let site = Site::new(dir.path()).unwrap();
        let mut out = Vec::new();
        let report = run(&site, &MarkdownRenderer::new(), &mut out).unwrap();

        assert_eq!(report.assets_copied, 1);
        assert_eq!(report.pages_copied, 2);
        assert_eq!(report.posts[0].name, "first");
        assert_eq!(String::from_utf8(out).unwrap(), "Posts: [\"first.md\"]\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("generated/posts/first.html")).unwrap(),
            "<body><p><em>hello</em></p>\n</body>"
        );
    }

    #[test]
    fn test_run_without_posts() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());

        let site = Site::new(dir.path()).unwrap();
        let mut out = Vec::new();
        let report = run(&site, &MarkdownRenderer::new(), &mut out).unwrap();

        assert!(report.posts.is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "Posts: []\n");
        assert!(dir.path().join("generated/posts").is_dir());
    }
}
