//! Post template - a page split into header and footer around a marker

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Template loading and parsing errors
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template marker must not be empty")]
    EmptyMarker,

    #[error("Template marker {0:?} not found")]
    MissingMarker(String),

    #[error("Template marker {marker:?} appears {count} times, expected exactly once")]
    DuplicateMarker { marker: String, count: usize },

    #[error("Failed to read template {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Header and footer fragments of a post page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTemplate {
    header: String,
    footer: String,
}

impl PostTemplate {
    /// Split `text` on `marker`, which must occur exactly once
    pub fn parse(text: &str, marker: &str) -> Result<Self, TemplateError> {
        if marker.is_empty() {
            return Err(TemplateError::EmptyMarker);
        }

        match text.matches(marker).count() {
            0 => Err(TemplateError::MissingMarker(marker.to_string())),
            1 => {
                let (header, footer) = text
                    .split_once(marker)
                    .ok_or_else(|| TemplateError::MissingMarker(marker.to_string()))?;
                Ok(Self {
                    header: header.to_string(),
                    footer: footer.to_string(),
                })
            }
            count => Err(TemplateError::DuplicateMarker {
                marker: marker.to_string(),
                count,
            }),
        }
    }

    /// Read a template file and split it on `marker`
    pub fn load<P: AsRef<Path>>(path: P, marker: &str) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, marker)
    }

    /// Text before the marker
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Text after the marker
    pub fn footer(&self) -> &str {
        &self.footer
    }
}
