//! Output formats for an [`ExtractionResult`](crate::ExtractionResult).

pub mod json;
pub mod markdown;
pub mod text;

pub use json::{JsonConfig, JsonFormatter, convert_to_json};
pub use markdown::{MarkdownConfig, MarkdownFormatter, convert_to_markdown};
pub use text::{TextConfig, TextFormatter, convert_to_text};

use crate::extract::ExtractionResult;

/// Descriptive fields shown around formatted content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleInfo {
    pub title: Option<String>,
    /// Where the article was read from.
    pub source: Option<String>,
    pub word_count: usize,
    pub image_count: usize,
}

impl ArticleInfo {
    pub fn from_result(result: &ExtractionResult, source: Option<&str>) -> Self {
        Self {
            title: Some(result.title.clone()).filter(|t| !t.is_empty()),
            source: source.map(String::from),
            word_count: result.text().split_whitespace().count(),
            image_count: result.images.len(),
        }
    }
}
