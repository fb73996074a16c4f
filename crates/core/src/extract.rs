//! The fallback chain: turns a page into an [`ExtractionResult`].
//!
//! Extraction degrades through fixed tiers until something is found:
//!
//! 1. **Primary**: the candidate selector picks a container; blocks are
//!    extracted from it.
//! 2. **Secondary**: if the primary content is short, the first narrow
//!    article selector match is extracted instead and its images merged.
//! 3. **Tertiary**: if there is still no content, `<body>` is pruned and
//!    extracted, then as a last step its raw text is regrouped.
//!
//! When no tier collected any image, a broad sweep accepts every large image
//! outside page chrome.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;
use crate::blocks::{BlockExtractor, BlockKind, ContentBlock};
use crate::images::{ImageProcessor, ImageRecord, ImageRules, ImageSet, SweepMode};
use crate::parse::{Document, compile_selector, element_text};
use crate::rules;
use crate::sanitize::Sanitizer;
use crate::select::CandidateSelector;
use crate::text::{paragraph, split_blank_lines, split_sentences};

static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// Tables and thresholds for extraction.
///
/// Defaults are copied from [`crate::rules`]; callers can extend any table.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Content container selectors, highest priority first.
    pub content_selectors: Vec<String>,
    /// Selectors for the secondary tier.
    pub narrow_selectors: Vec<String>,
    /// Removed from the whole document before anything else.
    pub sanitize_denylist: Vec<String>,
    /// Excluded when measuring candidates and pruned from the winner.
    pub candidate_denylist: Vec<String>,
    /// Pruned from `<body>` before the tertiary tier.
    pub body_denylist: Vec<String>,
    /// Image filtering tables.
    pub image_rules: ImageRules,
    /// A candidate needs more text than this (default: 300).
    pub candidate_min_chars: usize,
    /// Primary content shorter than this triggers the secondary tier (default: 200).
    pub sufficient_chars: usize,
    /// A child container needs more text than this to be split (default: 100).
    pub container_min_chars: usize,
}

fn table(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            content_selectors: table(rules::CONTENT_SELECTORS),
            narrow_selectors: table(rules::NARROW_SELECTORS),
            sanitize_denylist: table(rules::SANITIZE_DENYLIST),
            candidate_denylist: table(rules::CANDIDATE_DENYLIST),
            body_denylist: table(rules::BODY_DENYLIST),
            image_rules: ImageRules::default(),
            candidate_min_chars: rules::CANDIDATE_MIN_CHARS,
            sufficient_chars: rules::SUFFICIENT_CONTENT_CHARS,
            container_min_chars: rules::CONTAINER_MIN_CHARS,
        }
    }
}

/// Which tier produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Primary,
    Secondary,
    Tertiary,
    /// Body text regrouped without any markup structure.
    RawText,
}

/// The output of one extraction. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: String,
    /// Concatenated block markup.
    pub content: String,
    /// Unique by `src`, ordered by non-decreasing `position`.
    pub images: Vec<ImageRecord>,
    pub blocks: Vec<ContentBlock>,
    pub tier: Tier,
}

impl ExtractionResult {
    /// Character length of the content.
    pub fn content_chars(&self) -> usize {
        self.content.chars().count()
    }

    /// Plain text of the content, one line per block.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| element_text_of(&block.markup))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn element_text_of(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    fragment.root_element().text().collect::<String>().trim().to_string()
}

/// Runs the whole fallback chain over one page.
///
/// `page_url` supplies the origin for relative image URLs.
///
/// # Errors
///
/// Only fails on an invalid selector in `config`; markup problems degrade to
/// a lower tier instead.
pub fn extract_article(html: &str, page_url: &Url, config: &ExtractConfig) -> Result<ExtractionResult> {
    let mut doc = Document::parse(html);
    Sanitizer::new(&config.sanitize_denylist)?.sanitize(&mut doc);

    let title = doc.resolve_title();
    let processor = ImageProcessor::new(page_url, config.image_rules.clone())?;
    let extractor = BlockExtractor::new(&processor, &title).with_container_min_chars(config.container_min_chars);
    let candidates =
        CandidateSelector::new(&config.content_selectors, &config.candidate_denylist, config.candidate_min_chars)?;

    let mut images = ImageSet::new();
    let mut blocks = Vec::new();
    let mut tier = Tier::Primary;

    if let Some(candidate) = candidates.select_and_prune(&mut doc)
        && let Some(root) = doc.element(candidate.node)
    {
        let walk = extractor.extract(root);
        let primary_chars = walk.content().trim().chars().count();
        images.merge(walk.images);
        blocks = walk.blocks;

        if primary_chars < config.sufficient_chars {
            tracing::debug!(primary_chars, "primary content insufficient, trying narrow selectors");
            let narrow = compile_selector(&config.narrow_selectors.join(", "))?;
            if let Some(root) = doc.first(&narrow) {
                let walk = extractor.extract(root);
                let secondary_chars = walk.content().trim().chars().count();
                images.merge(walk.images);
                // A narrow match can be a smaller fragment of the same page;
                // it only replaces the primary content when it carries more.
                if secondary_chars > primary_chars {
                    blocks = walk.blocks;
                    tier = Tier::Secondary;
                }
            }
        }
    }

    if is_empty(&blocks) {
        tracing::debug!("no content from selectors, falling back to body");
        tier = Tier::Tertiary;
        let body_sanitizer = Sanitizer::new(&config.body_denylist)?;
        if let Some(body) = doc.body().map(|b| b.id()) {
            body_sanitizer.prune(&mut doc, body);
        }

        if let Some(body) = doc.body() {
            let walk = extractor.extract(body);
            images.merge(walk.images);
            blocks = walk.blocks;

            if is_empty(&blocks) {
                tracing::debug!("body extraction empty, regrouping raw text");
                tier = Tier::RawText;
                blocks = raw_text_blocks(&element_text(body));
                for img in body.select(&IMAGE) {
                    if let Some(record) = processor.accept(img, 0, SweepMode::Targeted) {
                        images.insert(record);
                    }
                }
            }
        }
    }

    if images.is_empty() {
        tracing::debug!("no images collected, running broad sweep");
        for img in doc.html().select(&IMAGE) {
            if let Some(record) = processor.accept(img, 0, SweepMode::Broad) {
                images.insert(record);
            }
        }
    }

    let content: String = blocks.iter().map(|b| b.markup.as_str()).collect();
    let images = images.into_sorted();
    tracing::debug!(?tier, content_chars = content.chars().count(), images = images.len(), "extraction finished");

    Ok(ExtractionResult { title, content, images, blocks, tier })
}

fn is_empty(blocks: &[ContentBlock]) -> bool {
    blocks.iter().all(|b| b.markup.trim().is_empty())
}

/// Regroups raw body text: blank-line paragraphs, else pairs of sentences,
/// else the whole text as one paragraph.
pub fn raw_text_blocks(text: &str) -> Vec<ContentBlock> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let to_block = |segment: &str| ContentBlock::new(BlockKind::Paragraph, paragraph(segment));

    let segments = split_blank_lines(text);
    if segments.len() > 1 {
        return segments.into_iter().map(to_block).collect();
    }

    let sentences = split_sentences(text);
    if sentences.len() > 1 {
        return sentences.chunks(2).map(|pair| to_block(&pair.join(" "))).collect();
    }

    vec![to_block(text)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/2024/05/story").unwrap()
    }

    fn extract(html: &str) -> ExtractionResult {
        extract_article(html, &page_url(), &ExtractConfig::default()).unwrap()
    }

    fn long_paragraphs() -> String {
        (1..=4)
            .map(|i| format!("<p>Paragraph {i} talks about harbors, tides and the people who work the docks at dawn.</p>"))
            .collect()
    }

    #[test]
    fn test_minimal_article() {
        let html = r#"<article><h1>T</h1><p>Hello.</p><img src="/a.png" width="400" height="300"></article>"#;
        let result = extract(html);

        assert_eq!(result.title, "T");
        assert!(result.content.contains("<p>Hello.</p>"));
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].src, "https://example.com/a.png");
    }

    #[test]
    fn test_primary_tier() {
        let html = format!(
            r#"<html><head><title>Tab title</title></head><body>
                <nav><a href="/">Home</a></nav>
                <article><h1>Harbor Life</h1>{}<img src="/img/docks.jpg" alt="Docks"></article>
                <footer>Footer text</footer>
            </body></html>"#,
            long_paragraphs()
        );
        let result = extract(&html);

        assert_eq!(result.tier, Tier::Primary);
        assert_eq!(result.title, "Harbor Life");
        assert_eq!(result.blocks[0].kind, BlockKind::Title);
        assert!(result.content.starts_with("<h1>Harbor Life</h1><p>Paragraph 1"));
        assert!(!result.content.contains("Footer text"));
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].position, result.content.find("<figure>").unwrap());
    }

    #[test]
    fn test_secondary_tier() {
        let html = format!(
            r#"<body>
                <div class="content"><p>Short lead.</p><span>{}</span></div>
                <div class="post-content"><p>{}</p><img src="second.jpg"></div>
            </body>"#,
            "filler ".repeat(60),
            "body text ".repeat(25)
        );
        let result = extract(&html);

        assert_eq!(result.tier, Tier::Secondary);
        assert!(result.content.contains("body text"));
        assert!(!result.content.contains("Short lead."));
        assert_eq!(result.images[0].src, "https://example.com/second.jpg");
    }

    #[test]
    fn test_shorter_secondary_keeps_primary() {
        let html = format!(
            r#"<body>
                <div class="content"><p>Short lead.</p><span>{}</span></div>
                <div class="post-content"><p>Tiny.</p></div>
            </body>"#,
            "filler ".repeat(60)
        );
        let result = extract(&html);

        assert_eq!(result.tier, Tier::Primary);
        assert_eq!(result.content, "<p>Short lead.</p>");
    }

    #[test]
    fn test_tertiary_plain_text() {
        let text = "Plain text without any paragraph tags at all. ".repeat(4);
        let html = format!("<html><body><div>{text}\n\n{text}</div></body></html>");
        let result = extract(&html);

        assert_eq!(result.tier, Tier::Tertiary);
        assert_eq!(result.blocks.len(), 2);
        assert!(result.blocks.iter().all(|b| b.kind == BlockKind::Paragraph));
    }

    #[test]
    fn test_raw_text_tier() {
        let html = "<body><p> </p><span>Loose text one. Loose text two. Loose text three.</span></body>";
        let result = extract(html);

        assert_eq!(result.tier, Tier::RawText);
        assert_eq!(result.content, "<p>Loose text one. Loose text two.</p><p>Loose text three.</p>");
    }

    #[test]
    fn test_raw_text_blocks() {
        assert!(raw_text_blocks("   ").is_empty());
        assert_eq!(raw_text_blocks("one\n\ntwo").len(), 2);
        assert_eq!(raw_text_blocks("lowercase only. no breaks")[0].markup, "<p>lowercase only. no breaks</p>");
    }

    #[test]
    fn test_broad_sweep_only_when_no_images() {
        let html = format!(
            r#"<body><article>{}<img src="/icon-hero.jpg" width="800"></article>
               <header><img src="/banner.jpg" width="1200"></header></body>"#,
            long_paragraphs()
        );
        let result = extract(&html);

        let srcs: Vec<_> = result.images.iter().map(|i| i.src.as_str()).collect();
        assert_eq!(srcs, ["https://example.com/icon-hero.jpg"]);
        assert_eq!(result.images[0].position, 0);
    }

    #[test]
    fn test_image_invariants() {
        let html = format!(
            r#"<article><h1>Gallery</h1>
                <p>Intro <img src="//cdn.example.net/one.jpg"> text.</p>
                {}
                <p>Lazy <img data-src="two.jpg" src="data:image/gif;base64,AAAA"> image.</p>
                <p>Again <img src="//cdn.example.net/one.jpg"></p>
                <img src="/logo.png">
                <img src="/chart.svg">
                <img src="/three.jpg">
            </article>"#,
            long_paragraphs()
        );
        let result = extract(&html);

        let positions: Vec<_> = result.images.iter().map(|i| i.position).collect();
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
        let mut srcs: Vec<_> = result.images.iter().map(|i| i.src.clone()).collect();
        assert!(srcs.iter().all(|s| s.starts_with("http://") || s.starts_with("https://")));
        assert!(srcs.iter().all(|s| !s.contains("logo") && !s.ends_with(".svg")));
        let total = srcs.len();
        srcs.dedup();
        assert_eq!(srcs.len(), total);
        assert_eq!(total, 3);
    }

    #[test]
    fn test_idempotent() {
        let html = format!(r#"<article><h1>Same</h1>{}<img src="/x.jpg"></article>"#, long_paragraphs());
        assert_eq!(extract(&html), extract(&html));
    }

    #[test]
    fn test_empty_document() {
        let result = extract("");
        assert_eq!(result.title, "");
        assert_eq!(result.content, "");
        assert!(result.images.is_empty());
    }

    #[test]
    fn test_invalid_configured_selector() {
        let config = ExtractConfig { content_selectors: vec!["[[nope".into()], ..Default::default() };
        assert!(extract_article("<p>x</p>", &page_url(), &config).is_err());
    }

    #[test]
    fn test_text_of_result() {
        let result = extract(r#"<article><h1>T</h1><p>Hello <b>there</b>.</p></article>"#);
        assert_eq!(result.text(), "T\n\nHello there.");
    }
}
