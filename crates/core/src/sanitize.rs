//! Destructive removal of non-content nodes.
//!
//! A [`Sanitizer`] owns one compiled selector group built from a denylist
//! table (see [`crate::rules`]) and detaches every matching element from a
//! [`Document`]. The pipeline sanitizes each document once, before any text
//! is measured, so chrome cannot inflate downstream length heuristics.

use ego_tree::NodeId;
use scraper::Selector;

use crate::Result;
use crate::parse::{Document, compile_selector};
use crate::rules;

/// Removes denylisted elements from a document.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    denylist: Selector,
}

impl Sanitizer {
    /// Builds a sanitizer from a denylist table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LecternError::HtmlParseError`] if any entry is not a valid selector.
    pub fn new<S: AsRef<str>>(denylist: &[S]) -> Result<Self> {
        let group = denylist.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
        Ok(Self { denylist: compile_selector(&group)? })
    }

    /// The document-level denylist from [`rules::SANITIZE_DENYLIST`].
    pub fn document() -> Result<Self> {
        Self::new(rules::SANITIZE_DENYLIST)
    }

    /// The compiled selector group.
    pub fn selector(&self) -> &Selector {
        &self.denylist
    }

    /// Detaches every matching element in the document. Returns the count removed.
    pub fn sanitize(&self, doc: &mut Document) -> usize {
        let ids: Vec<NodeId> = doc.html().select(&self.denylist).map(|el| el.id()).collect();
        let removed = doc.detach_all(&ids);
        tracing::debug!(removed, "sanitized document");
        removed
    }

    /// Detaches matching elements inside the subtree rooted at `root`.
    ///
    /// The root itself is kept even if it matches.
    pub fn prune(&self, doc: &mut Document, root: NodeId) -> usize {
        let ids: Vec<NodeId> = match doc.element(root) {
            Some(element) => element.select(&self.denylist).map(|el| el.id()).collect(),
            None => return 0,
        };
        doc.detach_all(&ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_removes_denylisted_elements() {
        let html = r#"
            <html>
                <head><script>alert('test');</script><style>body{color:red;}</style></head>
                <body>
                    <nav><a href="/">Home</a></nav>
                    <iframe src="https://example.com/embed"></iframe>
                    <svg><rect width="100" height="100"/></svg>
                    <div class="share-buttons">Share this</div>
                    <aside>Related stuff</aside>
                    <article><p>Content</p></article>
                    <footer>Copyright</footer>
                </body>
            </html>
        "#;

        let mut doc = Document::parse(html);
        let sanitizer = Sanitizer::document().unwrap();
        let removed = sanitizer.sanitize(&mut doc);

        assert!(removed >= 7);
        let out = doc.as_string();
        assert!(!out.contains("<script"));
        assert!(!out.contains("alert"));
        assert!(!out.contains("color:red"));
        assert!(!out.contains("<iframe"));
        assert!(!out.contains("<svg"));
        assert!(!out.contains("Share this"));
        assert!(!out.contains("Related stuff"));
        assert!(!out.contains("Copyright"));
        assert!(out.contains("<p>Content</p>"));
    }

    #[test]
    fn test_header_nav_only_removes_nav() {
        let html = "<header><h1>Kept headline</h1><nav>Menu</nav></header>";
        let mut doc = Document::parse(html);
        Sanitizer::document().unwrap().sanitize(&mut doc);
        let text = doc.text_content();
        assert!(text.contains("Kept headline"));
        assert!(!text.contains("Menu"));
    }

    #[test]
    fn test_prune_keeps_root_and_outside() {
        let html = r#"<div class="comments">Outside</div><main id="m"><form>Sign up</form><p>Body text</p></main>"#;
        let mut doc = Document::parse(html);
        let root = doc.select("#m").unwrap()[0].id();
        let sanitizer = Sanitizer::new(rules::CANDIDATE_DENYLIST).unwrap();

        assert_eq!(sanitizer.prune(&mut doc, root), 1);
        let text = doc.text_content();
        assert!(text.contains("Outside"));
        assert!(text.contains("Body text"));
        assert!(!text.contains("Sign up"));
    }

    #[test]
    fn test_invalid_denylist() {
        assert!(Sanitizer::new(&["[[broken"]).is_err());
    }
}
