//! sitegen: a small static site builder
//!
//! Copies static assets and pages from a `source/` directory into a freshly
//! rebuilt output directory, and turns every markdown post into an HTML page
//! by wrapping the rendered markdown in a header/footer template.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod templates;

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the optional configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory (assets, static pages, post template)
    pub source_dir: PathBuf,
    /// Directory scanned for markdown posts
    pub post_source_dir: PathBuf,
    /// Output directory, rebuilt on every run
    pub output_dir: PathBuf,
    /// Directory generated posts are written to
    pub posts_output_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            tracing::debug!("Loading configuration from {:?}", config_path);
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let post_source_dir = base_dir.join(&config.post_source_dir);
        let output_dir = base_dir.join(&config.output_dir);
        let posts_output_dir = output_dir.join(&config.posts_dir);

        Self {
            config,
            base_dir,
            source_dir,
            post_source_dir,
            output_dir,
            posts_output_dir,
        }
    }

    /// Path of the post template
    pub fn template_path(&self) -> PathBuf {
        self.source_dir.join(&self.config.post_template)
    }

    /// Build the site with the configured converter, reporting posts to `out`
    pub fn build<W: Write>(&self, out: &mut W) -> Result<generator::BuildReport> {
        let converter = content::converter_from_config(&self.config.converter);
        commands::build::run(self, converter.as_ref(), out)
    }

    /// Remove the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Posts a build would convert
    pub fn posts(&self) -> Result<Vec<content::Post>> {
        content::PostLoader::new(&self.post_source_dir, &self.config.post_extension).load()
    }
}
