use serde::Serialize;

use crate::Result;
use crate::blocks::ContentBlock;
use crate::extract::{ExtractionResult, Tier};
use crate::formatters::markdown::{LinkReference, extract_links};
use crate::images::ImageRecord;

/// Complete JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a str>,
    pub content: &'a str,
    pub images: &'a [ImageRecord],
    pub tier: Tier,
    /// Plain text, one paragraph per block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<&'a [ContentBlock]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<JsonReference>>,
}

/// A reference link for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct JsonReference {
    /// Reference index, starting at 1
    pub index: usize,
    pub text: String,
    pub url: String,
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Include plain text in output
    pub include_text: bool,
    /// Include the typed block list
    pub include_blocks: bool,
    /// Include references array
    pub include_references: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

fn references(html: &str) -> Vec<JsonReference> {
    extract_links(html)
        .into_iter()
        .enumerate()
        .map(|(i, LinkReference { text, url })| JsonReference { index: i + 1, text, url })
        .collect()
}

/// Convert an extraction to JSON
pub fn convert_to_json(result: &ExtractionResult, source: Option<&str>, config: &JsonConfig) -> Result<String> {
    let output = JsonOutput {
        title: &result.title,
        source,
        content: &result.content,
        images: &result.images,
        tier: result.tier,
        text: config.include_text.then(|| result.text()),
        blocks: config.include_blocks.then_some(result.blocks.as_slice()),
        references: config.include_references.then(|| references(&result.content)),
    };

    if config.pretty { Ok(serde_json::to_string_pretty(&output)?) } else { Ok(serde_json::to_string(&output)?) }
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, result: &ExtractionResult, source: Option<&str>) -> Result<String> {
        convert_to_json(result, source, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractConfig, extract_article};
    use serde_json::Value;
    use url::Url;

    fn extract(html: &str) -> ExtractionResult {
        extract_article(html, &Url::parse("https://example.com/post").unwrap(), &ExtractConfig::default()).unwrap()
    }

    #[test]
    fn test_minimal_output() {
        let result = extract("<article><h1>Title</h1><p>Content here.</p></article>");
        let json: Value = serde_json::from_str(&convert_to_json(&result, None, &JsonConfig::default()).unwrap()).unwrap();

        assert_eq!(json["title"], "Title");
        assert_eq!(json["content"], "<h1>Title</h1><p>Content here.</p>");
        assert_eq!(json["images"], Value::Array(Vec::new()));
        assert_eq!(json["tier"], "tertiary");
        assert!(json.get("source").is_none());
        assert!(json.get("text").is_none());
        assert!(json.get("blocks").is_none());
        assert!(json.get("references").is_none());
    }

    #[test]
    fn test_all_sections() {
        let result = extract(
            r#"<article><h1>Title</h1><p>See <a href="https://a.com">A</a> and <a href="https://b.com">B</a>.</p></article>"#,
        );
        let config = JsonConfig { include_text: true, include_blocks: true, include_references: true, pretty: true };
        let output = JsonFormatter::new(config).convert(&result, Some("https://example.com/post")).unwrap();
        assert!(output.contains('\n'));

        let json: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["source"], "https://example.com/post");
        assert_eq!(json["text"], "Title\n\nSee A and B.");
        assert_eq!(json["blocks"][0]["kind"]["type"], "title");
        assert_eq!(json["references"][1]["index"], 2);
        assert_eq!(json["references"][1]["url"], "https://b.com");
    }
}
