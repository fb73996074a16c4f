use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::Result;
use crate::blocks::BlockKind;
use crate::extract::ExtractionResult;
use crate::formatters::ArticleInfo;
use crate::render::interleave;
use crate::rewrite::strip_images;

static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Configuration for Markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with title, source and counts
    pub include_frontmatter: bool,
    /// Generate reference table for all links
    pub include_references: bool,
    /// Strip images from output
    pub strip_images: bool,
    /// Render each extracted image as a figure where it was found
    pub inline_images: bool,
    /// Include title as H1 heading when the content has no title block
    pub include_title_heading: bool,
}

/// A collected link reference
#[derive(Debug, Clone)]
pub struct LinkReference {
    /// The link text
    pub text: String,
    /// The link URL
    pub url: String,
}

/// Convert an extraction to Markdown with optional frontmatter and references
pub fn convert_to_markdown(result: &ExtractionResult, source: Option<&str>, config: &MarkdownConfig) -> Result<String> {
    let info = ArticleInfo::from_result(result, source);
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(&info));
        output.push('\n');
    }

    let has_title_block = result.blocks.iter().any(|b| b.kind == BlockKind::Title);
    if config.include_title_heading
        && !has_title_block
        && let Some(title) = &info.title
    {
        output.push_str(&format!("# {}\n\n", title));
    }

    let html = if config.strip_images {
        strip_images(&result.content)
    } else if config.inline_images {
        interleave(result)
    } else {
        result.content.clone()
    };

    output.push_str(&html_to_markdown(&html));

    if config.include_references {
        let links = extract_links(&html);
        if !links.is_empty() {
            output.push_str("\n\n## References\n\n");
            output.push_str(&generate_reference_table(&links));
        }
    }

    Ok(output)
}

fn generate_frontmatter(info: &ArticleInfo) -> String {
    let mut frontmatter = String::from("+++");

    if let Some(title) = &info.title {
        frontmatter.push_str(&format!("\ntitle = {}", toml_escape_string(title)));
    }

    if let Some(source) = &info.source {
        frontmatter.push_str(&format!("\nsource = {}", toml_escape_string(source)));
    }

    frontmatter.push_str(&format!("\nword_count = {}", info.word_count));
    frontmatter.push_str(&format!("\nimages = {}", info.image_count));
    frontmatter.push_str("\n+++\n");

    frontmatter
}

/// Escape a string for TOML format
fn toml_escape_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

#[cfg(feature = "markdown")]
fn html_to_markdown(html: &str) -> String {
    htmd::convert(html).unwrap_or_default()
}

/// Fallback when the markdown feature is disabled: plain text.
#[cfg(not(feature = "markdown"))]
fn html_to_markdown(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect::<String>()
}

/// Links with non-empty text, first occurrence of each URL only.
pub fn extract_links(html: &str) -> Vec<LinkReference> {
    let fragment = Html::parse_fragment(html);
    let mut links = Vec::new();
    let mut seen_urls = HashMap::new();

    for element in fragment.select(&LINK) {
        let text = element.text().collect::<String>().trim().to_string();
        let Some(url) = element.value().attr("href") else { continue };

        if text.is_empty() || url.is_empty() || seen_urls.contains_key(url) {
            continue;
        }

        seen_urls.insert(url.to_string(), links.len());
        links.push(LinkReference { text, url: url.to_string() });
    }

    links
}

fn generate_reference_table(links: &[LinkReference]) -> String {
    let mut table = String::from("| # | Text | URL |\n");
    table.push_str("|---|------|-----|\n");

    for (i, link) in links.iter().enumerate() {
        table.push_str(&format!("| {} | {} | {} |\n", i + 1, escape_pipe(&link.text), escape_pipe(&link.url)));
    }

    table
}

/// Escape pipe characters for Markdown tables
fn escape_pipe(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Markdown formatter with configurable options
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, result: &ExtractionResult, source: Option<&str>) -> Result<String> {
        convert_to_markdown(result, source, &self.config)
    }
}
