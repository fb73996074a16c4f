//! Streaming rewrites over serialized block markup.
//!
//! Block markup is produced by serializing a DOM subtree, then passed through
//! `lol_html` for the tag-level edits below. A rewriter failure leaves the
//! input unchanged.

use lol_html::html_content::ContentType;

/// Fallback alt text for image placeholders.
pub const PLACEHOLDER_ALT: &str = "Image";

/// Replaces every `<img>` with the text `[Image: alt]`.
///
/// ```rust
/// use lectern_core::rewrite::image_placeholders;
///
/// let html = r#"<p>Before <img src="a.jpg" alt="A harbor"> after <img src="b.jpg"></p>"#;
/// assert_eq!(image_placeholders(html), "<p>Before [Image: A harbor] after [Image: Image]</p>");
/// ```
pub fn image_placeholders(html: &str) -> String {
    if !html.contains("<img") {
        return html.to_string();
    }

    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![lol_html::element!("img", |el| {
                let alt = el.get_attribute("alt").filter(|alt| !alt.is_empty());
                let text = format!("[Image: {}]", alt.as_deref().unwrap_or(PLACEHOLDER_ALT));
                el.replace(&text, ContentType::Text);
                Ok(())
            })],
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    match rewriter.write(html.as_bytes()) {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    match rewriter.end() {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    output
}

/// Removes `<img>` and `<figure>` elements entirely, for text-only output.
pub fn strip_images(html: &str) -> String {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("figure", |el| {
                    el.remove();
                    Ok(())
                }),
                lol_html::element!("img", |el| {
                    el.remove();
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    match rewriter.write(html.as_bytes()) {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    match rewriter.end() {
        Ok(_) => {}
        Err(_) => return html.to_string(),
    }

    output
}
