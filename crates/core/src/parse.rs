//! HTML parsing and DOM access.
//!
//! This module provides the [`Document`] type, a thin owner around
//! `scraper::Html` that the pipeline mutates in place (sanitizing, pruning)
//! between read-only extraction passes.
//!
//! # Example
//!
//! ```rust
//! use lectern_core::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Page</title></head>
//!         <body>
//!             <h1>Heading</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! assert_eq!(doc.resolve_title(), "Heading");
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use ego_tree::NodeId;
use ego_tree::iter::Edge;
use scraper::{ElementRef, Html, Node, Selector};

use crate::{LecternError, Result};

/// Compiles a selector, mapping failures to [`LecternError::HtmlParseError`].
pub fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| LecternError::HtmlParseError(format!("Invalid selector {selector:?}: {e}")))
}

/// Represents a parsed HTML document.
///
/// # Example
///
/// ```rust
/// use lectern_core::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html);
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document. Parsing never fails; broken markup is
    /// repaired the way a browser would.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Gets the underlying `scraper::Html`.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the entire HTML as a string.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`LecternError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).collect())
    }

    /// First element matching an already compiled selector, in document order.
    pub fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// The `<body>` element, which html5ever always synthesizes.
    pub fn body(&self) -> Option<ElementRef<'_>> {
        let selector = Selector::parse("body").ok()?;
        self.first(&selector)
    }

    /// Gets the text of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.first(&selector).map(|el| el.text().collect::<String>())
    }

    /// Article title: first `<h1>`, else `<title>`, else empty.
    pub fn resolve_title(&self) -> String {
        if let Ok(selector) = Selector::parse("h1")
            && let Some(h1) = self.first(&selector)
        {
            let text = element_text(h1);
            let text = text.trim();
            if !text.is_empty() {
                return text.to_string();
            }
        }

        self.title().map(|t| t.trim().to_string()).unwrap_or_default()
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// Resolves a node id captured earlier back into an element.
    pub(crate) fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// Detaches every listed node from the tree. Returns how many were found.
    pub(crate) fn detach_all(&mut self, ids: &[NodeId]) -> usize {
        let mut removed = 0;
        for id in ids {
            if let Some(mut node) = self.html.tree.get_mut(*id) {
                node.detach();
                removed += 1;
            }
        }
        removed
    }
}

/// Concatenated text of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Lowercase tag name of an element.
pub fn tag_name(element: ElementRef<'_>) -> String {
    element.value().name().to_ascii_lowercase()
}

/// Text of an element with the subtrees matching `excluded` left out.
///
/// Used to measure a candidate as if its chrome had been removed, without
/// touching the document.
pub fn text_excluding(element: ElementRef<'_>, excluded: &Selector) -> String {
    let mut out = String::new();
    let mut skipping: Option<NodeId> = None;

    for edge in element.traverse() {
        match edge {
            Edge::Open(node) if skipping.is_none() => match node.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(_) if node.id() != element.id() => {
                    if ElementRef::wrap(node).is_some_and(|el| excluded.matches(&el)) {
                        skipping = Some(node.id());
                    }
                }
                _ => {}
            },
            Edge::Close(node) if skipping == Some(node.id()) => skipping = None,
            _ => {}
        }
    }

    out
}
