//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
///
/// Every field has a default, so a site without `_config.yml` builds from
/// the standard `source/` layout into `generated/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub source_dir: String,
    pub output_dir: String,
    pub posts_dir: String,
    pub post_source_dir: String,

    // Static content
    pub asset_dirs: Vec<String>,
    pub static_pages: Vec<String>,

    // Posts
    pub post_template: String,
    pub template_marker: String,
    pub post_extension: String,
    pub output_extension: String,

    // Rendering
    #[serde(default)]
    pub converter: ConverterConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_dir: "source".to_string(),
            output_dir: "generated".to_string(),
            posts_dir: "posts".to_string(),
            post_source_dir: ".".to_string(),

            asset_dirs: vec![
                "images".to_string(),
                "style".to_string(),
                "sourcecode".to_string(),
            ],
            static_pages: vec!["index.html".to_string(), "projects.html".to_string()],

            post_template: "post_template.html".to_string(),
            template_marker: "@content".to_string(),
            post_extension: "md".to_string(),
            output_extension: "html".to_string(),

            converter: ConverterConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        Ok(config)
    }
}

/// Markdown converter selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConverterConfig {
    /// External program reading markdown on stdin and writing HTML to stdout
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// In-process pulldown-cmark renderer
    Builtin {
        #[serde(default)]
        line_numbers: bool,
    },
}

impl ConverterConfig {
    /// Apply a converter kind chosen on the command line
    ///
    /// Asking for the kind already configured keeps its settings; switching
    /// to `command` from `builtin` falls back to the default program.
    pub fn with_override(self, kind: Option<ConverterKind>) -> Self {
        match (kind, self) {
            (None, config) => config,
            (Some(ConverterKind::Command), config @ ConverterConfig::Command { .. }) => config,
            (Some(ConverterKind::Command), ConverterConfig::Builtin { .. }) => {
                ConverterConfig::default()
            }
            (Some(ConverterKind::Builtin), config @ ConverterConfig::Builtin { .. }) => config,
            (Some(ConverterKind::Builtin), ConverterConfig::Command { .. }) => {
                ConverterConfig::Builtin {
                    line_numbers: false,
                }
            }
        }
    }
}

/// Converter kinds selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConverterKind {
    /// Run the configured external program (smu by default)
    Command,
    /// Render in-process with pulldown-cmark
    Builtin,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig::Command {
            program: "smu".to_string(),
            args: Vec::new(),
        }
    }
}
