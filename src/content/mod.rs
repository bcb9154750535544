//! Content module - post discovery and markdown conversion

pub mod loader;
mod markdown;
mod post;

pub use loader::PostLoader;
pub use markdown::{
    converter_from_config, CommandConverter, ConvertError, MarkdownConverter, MarkdownRenderer,
};
pub use post::Post;
