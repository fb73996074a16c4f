//! Rendering extracted images back into the content.
//!
//! Extraction replaces inline `<img>` tags with text placeholders and keeps
//! the images as a positioned list. [`interleave`] puts a figure for each
//! image in front of the block it was found at.

use crate::blocks::{BlockKind, figure_markup};
use crate::extract::ExtractionResult;

/// Content markup with a `<figure>` inserted before the block at each
/// image's position.
///
/// Standalone figure blocks already show their own image, so that image is
/// not repeated. Images positioned past the last block go at the end.
pub fn interleave(result: &ExtractionResult) -> String {
    let mut out = String::with_capacity(result.content.len());
    let mut pending = result.images.iter().peekable();
    let mut offset = 0;

    for block in &result.blocks {
        let mut due = Vec::new();
        while let Some(image) = pending.next_if(|image| image.position <= offset) {
            due.push(image);
        }

        let shown = match block.kind {
            BlockKind::Figure => block.image.as_deref(),
            _ => None,
        };
        for image in due.into_iter().filter(|image| Some(image.src.as_str()) != shown) {
            out.push_str(&figure_markup(image));
        }

        out.push_str(&block.markup);
        offset += block.char_len();
    }

    for image in pending {
        out.push_str(&figure_markup(image));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::ContentBlock;
    use crate::extract::{ExtractConfig, Tier, extract_article};
    use crate::images::ImageRecord;
    use url::Url;

    fn extract(html: &str) -> ExtractionResult {
        extract_article(html, &Url::parse("https://example.com/story").unwrap(), &ExtractConfig::default()).unwrap()
    }

    #[test]
    fn test_inline_image_before_its_block() {
        let result = extract(r#"<article><p>Hello.</p><p>Look <img src="/pic.jpg" alt="Pic"> here.</p></article>"#);
        let html = interleave(&result);
        assert_eq!(
            html,
            r#"<p>Hello.</p><figure><img src="https://example.com/pic.jpg" alt="Pic" /><figcaption>Pic</figcaption></figure><p>Look [Image: Pic] here.</p>"#
        );
    }

    #[test]
    fn test_standalone_figure_not_repeated() {
        let lead = "<p>A long lead paragraph about the harbor, the tides and the boats moored along it.</p>".repeat(4);
        let result = extract(&format!(r#"<article>{lead}<img src="/a.png" width="400" height="300"></article>"#));
        assert!(result.blocks.last().is_some_and(|b| b.kind == BlockKind::Figure));
        let html = interleave(&result);
        assert_eq!(html.matches("https://example.com/a.png").count(), 1);
        assert_eq!(html, result.content);
    }

    #[test]
    fn test_figure_only_hides_its_own_image() {
        let figure = r#"<figure><img src="https://example.com/b.jpg" alt="B" /><figcaption>B</figcaption></figure>"#;
        let result = ExtractionResult {
            title: String::new(),
            content: format!("<p>A.</p>{figure}"),
            images: vec![ImageRecord { src: "https://example.com/a.jpg".into(), alt: "A".into(), position: 8 }],
            blocks: vec![
                ContentBlock::new(BlockKind::Paragraph, "<p>A.</p>".into()),
                ContentBlock::figure(figure.into(), "https://example.com/b.jpg"),
            ],
            tier: Tier::Primary,
        };

        let html = interleave(&result);
        assert_eq!(html.matches("https://example.com/a.jpg").count(), 1);
        assert!(html.find("a.jpg").unwrap() < html.find("b.jpg").unwrap());
    }

    #[test]
    fn test_no_images_is_content() {
        let result = extract("<article><h1>T</h1><p>Only text.</p></article>");
        assert_eq!(interleave(&result), result.content);
    }

    #[test]
    fn test_trailing_images_appended() {
        let mut result = extract(r#"<article><p>Hello.</p><p>Look <img src="/pic.jpg" alt="Pic"> here.</p></article>"#);
        result.images[0].position = 10_000;
        let html = interleave(&result);
        assert!(html.ends_with("<figcaption>Pic</figcaption></figure>"));
    }
}
