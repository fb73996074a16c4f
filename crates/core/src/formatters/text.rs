use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::Result;
use crate::blocks::{BlockKind, ContentBlock};
use crate::extract::ExtractionResult;
use crate::formatters::ArticleInfo;

static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Preserve paragraph structure with double newlines
    pub preserve_paragraphs: bool,

    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,

    /// Include title and source header
    pub include_header: bool,
}

/// Plain text formatter for reading an extraction in a terminal
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, result: &ExtractionResult, source: Option<&str>) -> Result<String> {
        convert_to_text(result, source, &self.config)
    }
}

/// Convert an extraction to plain text with specified configuration
pub fn convert_to_text(result: &ExtractionResult, source: Option<&str>, config: &TextConfig) -> Result<String> {
    let mut output = String::new();

    if config.include_header {
        output.push_str(&generate_header(&ArticleInfo::from_result(result, source)));
        output.push_str("\n\n");
    }

    let paragraphs: Vec<String> = result.blocks.iter().map(block_text).filter(|t| !t.is_empty()).collect();

    let text = if config.preserve_paragraphs {
        paragraphs.join("\n\n")
    } else {
        paragraphs.iter().map(|p| p.split_whitespace().collect::<Vec<_>>().join(" ")).collect::<Vec<_>>().join(" ")
    };

    let final_text = if config.line_width > 0 { wrap_text(&text, config.line_width) } else { text };

    output.push_str(&final_text);

    Ok(output.trim().to_string())
}

fn generate_header(info: &ArticleInfo) -> String {
    let mut header = String::new();

    if let Some(title) = &info.title {
        header.push_str(title);
        header.push('\n');
        header.push_str(&"=".repeat(title.chars().count()));
        header.push('\n');
    }

    let mut meta_parts = Vec::new();

    if let Some(source) = &info.source {
        meta_parts.push(format!("Source: {}", source));
    }

    meta_parts.push(format!("Words: {}", info.word_count));

    if info.image_count > 0 {
        meta_parts.push(format!("Images: {}", info.image_count));
    }

    header.push_str(&meta_parts.join(" | "));
    header.push('\n');

    header
}

/// Text of one block. List items go on their own lines with a marker.
fn block_text(block: &ContentBlock) -> String {
    let fragment = Html::parse_fragment(&block.markup);

    if let BlockKind::List { ordered } = block.kind {
        return fragment
            .select(&LIST_ITEM)
            .map(|li| collapse(&li.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .enumerate()
            .map(|(i, item)| if ordered { format!("{}. {}", i + 1, item) } else { format!("- {}", item) })
            .collect::<Vec<_>>()
            .join("\n");
    }

    collapse(&fragment.root_element().text().collect::<String>())
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrap each line to the given width, keeping blank lines between paragraphs
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    text.lines()
        .map(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() { String::new() } else { wrap_words(&words, width) }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap a slice of words to specified width
fn wrap_words(words: &[&str], width: usize) -> String {
    let mut lines = Vec::new();
    let mut current_line = Vec::new();
    let mut current_length = 0;

    for &word in words {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_length += 1 + word_len;
            current_line.push(word);
        } else {
            lines.push(current_line.join(" "));
            current_line = vec![word];
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line.join(" "));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractConfig, extract_article};
    use url::Url;

    fn extract(html: &str) -> ExtractionResult {
        extract_article(html, &Url::parse("https://example.com/post").unwrap(), &ExtractConfig::default()).unwrap()
    }

    #[test]
    fn test_convert_strips_tags() {
        let result = extract(r#"<article><p>Text with <strong>bold</strong> and <em>italic</em>.</p></article>"#);
        let text = convert_to_text(&result, None, &TextConfig::default()).unwrap();
        assert_eq!(text, "Text with bold and italic.");
    }

    #[test]
    fn test_preserve_paragraphs() {
        let result = extract(
            "<article><h1>Main Title</h1><p>First paragraph.</p><p>Second paragraph.</p><blockquote>Quoted text.</blockquote></article>",
        );
        let config = TextConfig { preserve_paragraphs: true, ..Default::default() };
        let text = convert_to_text(&result, None, &config).unwrap();
        assert_eq!(text, "Main Title\n\nFirst paragraph.\n\nSecond paragraph.\n\nQuoted text.");

        let flat = convert_to_text(&result, None, &TextConfig::default()).unwrap();
        assert_eq!(flat, "Main Title First paragraph. Second paragraph. Quoted text.");
    }

    #[test]
    fn test_lists() {
        let result = extract(
            "<article><p>Intro.</p><ul><li>First item</li><li>Second item</li></ul><ol><li>One</li><li>Two</li></ol></article>",
        );
        let config = TextConfig { preserve_paragraphs: true, ..Default::default() };
        let text = convert_to_text(&result, None, &config).unwrap();
        assert!(text.contains("- First item\n- Second item"));
        assert!(text.contains("1. One\n2. Two"));
    }

    #[test]
    fn test_header_with_source() {
        let result = extract("<article><h1>Test Title</h1><p>Content here.</p></article>");
        let config = TextConfig { include_header: true, ..Default::default() };
        let text = convert_to_text(&result, Some("https://example.com/post"), &config).unwrap();
        assert!(text.starts_with("Test Title\n==========\n"));
        assert!(text.contains("Source: https://example.com/post | Words: 4"));
        assert!(!text.contains("Images:"));
        assert!(text.ends_with("Content here."));
    }

    #[test]
    fn test_header_without_title() {
        let header = generate_header(&ArticleInfo { word_count: 3, image_count: 2, ..Default::default() });
        assert_eq!(header, "Words: 3 | Images: 2\n");
    }

    #[test]
    fn test_wrap_words() {
        let words = vec!["hello", "world", "this", "is", "a", "test"];
        assert_eq!(wrap_words(&words, 10), "hello\nworld this\nis a test");
    }

    #[test]
    fn test_wrap_text_keeps_paragraph_breaks() {
        let wrapped = wrap_text("one two three\n\nfour five", 8);
        assert_eq!(wrapped, "one two\nthree\n\nfour\nfive");
    }

    #[test]
    fn test_wrap_text_with_zero_width() {
        let text = "This is a line";
        assert_eq!(wrap_text(text, 0), text);
    }

    #[test]
    fn test_text_formatter() {
        let result = extract("<article><p>Test content for formatter.</p></article>");
        let config = TextConfig { line_width: 12, ..Default::default() };
        let formatter = TextFormatter::new(config.clone());
        assert_eq!(formatter.convert(&result, None).unwrap(), convert_to_text(&result, None, &config).unwrap());
        assert!(formatter.convert(&result, None).unwrap().contains('\n'));
    }
}
