//! DOM-to-block normalization.
//!
//! [`BlockExtractor::extract`] walks one element's subtree and emits typed
//! [`ContentBlock`]s in reading order, collecting content images on the way.
//! Emission and image anchoring share one accumulator, [`Walk`], which is
//! threaded through a depth-first traversal: every image gets the character
//! offset of the content emitted before the block that holds it.
//!
//! Two strategies exist. When the subtree contains any `<p>`, block tags are
//! serialized as-is, with generic containers flattened away. Otherwise the
//! text is regrouped into paragraphs from blank lines or, failing that,
//! sentence boundaries. Direct child images and figures are appended after
//! either strategy.

use std::sync::LazyLock;

use ego_tree::NodeId;
use ego_tree::iter::Edge;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

use crate::images::{ImageProcessor, ImageRecord, ImageSet, SweepMode};
use crate::parse::{element_text, tag_name};
use crate::rewrite::{PLACEHOLDER_ALT, image_placeholders};
use crate::rules;
use crate::text::{escape_html, paragraph, split_blank_lines, split_sentences};

static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// What a block represents in the article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum BlockKind {
    /// The `<h1>` that supplied the article title.
    Title,
    /// A heading directly following the title.
    Subtitle,
    Heading { level: u8 },
    Paragraph,
    Quote,
    List { ordered: bool },
    Figure,
}

/// One unit of article content in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub kind: BlockKind,
    /// Serialized markup, images already replaced with placeholders.
    pub markup: String,
    /// Resolved `src` of the image a figure block shows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ContentBlock {
    pub fn new(kind: BlockKind, markup: String) -> Self {
        Self { kind, markup, image: None }
    }

    /// A figure block showing the image at `src`.
    pub fn figure(markup: String, src: &str) -> Self {
        Self { kind: BlockKind::Figure, markup, image: Some(src.to_string()) }
    }

    /// Length of the markup in characters; what the offset advances by.
    pub fn char_len(&self) -> usize {
        self.markup.chars().count()
    }
}

/// Accumulator threaded through the traversal.
#[derive(Debug, Clone, Default)]
pub struct Walk {
    pub blocks: Vec<ContentBlock>,
    pub images: ImageSet,
    /// Characters emitted so far.
    pub offset: usize,
}

impl Walk {
    fn push(&mut self, block: ContentBlock) {
        self.offset += block.char_len();
        self.blocks.push(block);
    }

    fn push_paragraph(&mut self, text: &str) {
        self.push(ContentBlock::new(BlockKind::Paragraph, paragraph(text)));
    }

    /// Concatenated markup of all blocks.
    pub fn content(&self) -> String {
        self.blocks.iter().map(|b| b.markup.as_str()).collect()
    }

    /// True when no block holds any non-whitespace markup.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.markup.trim().is_empty())
    }
}

/// Extracts blocks and images from a subtree.
pub struct BlockExtractor<'a> {
    images: &'a ImageProcessor,
    title: &'a str,
    container_min_chars: usize,
}

impl<'a> BlockExtractor<'a> {
    /// `title` is the resolved article title, used to tag the title block.
    pub fn new(images: &'a ImageProcessor, title: &'a str) -> Self {
        Self { images, title, container_min_chars: rules::CONTAINER_MIN_CHARS }
    }

    /// Minimum text for a child container to be split on its own.
    pub fn with_container_min_chars(mut self, chars: usize) -> Self {
        self.container_min_chars = chars;
        self
    }

    /// Runs the block pass and the standalone-image pass.
    ///
    /// The input is never modified; calling twice yields identical output.
    pub fn extract(&self, root: ElementRef<'_>) -> Walk {
        let mut walk = Walk::default();

        if root.select(&PARAGRAPH).next().is_some() {
            self.walk_structured(root, &mut walk);
        } else {
            self.unstructured(root, &mut walk);
        }

        self.standalone(root, &mut walk);

        if walk.is_empty() {
            self.container_sweep(root, &mut walk);
        }

        walk
    }

    /// Depth-first over the subtree without recursion, so nesting depth is
    /// bounded by the heap. Figures and emitted blocks are not descended into.
    fn walk_structured(&self, root: ElementRef<'_>, walk: &mut Walk) {
        let mut skipping: Option<NodeId> = None;
        for edge in root.traverse() {
            match edge {
                Edge::Open(node) if skipping.is_none() && node.id() != root.id() => {
                    let Some(element) = ElementRef::wrap(node) else { continue };
                    let tag = tag_name(element);
                    if tag == "figure" {
                        skipping = Some(node.id());
                    } else if let Some(kind) = block_kind(&tag) {
                        self.emit(element, kind, walk);
                        skipping = Some(node.id());
                    }
                }
                Edge::Close(node) if skipping == Some(node.id()) => skipping = None,
                _ => {}
            }
        }
    }

    /// Emits one block element. Blocks without text are skipped along with
    /// any images inside them; images of kept blocks are recorded at the
    /// offset before the block.
    fn emit(&self, element: ElementRef<'_>, kind: BlockKind, walk: &mut Walk) {
        let text = element_text(element);
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        for img in element.select(&IMAGE) {
            if let Some(record) = self.images.accept(img, walk.offset, SweepMode::Targeted) {
                walk.images.insert(record);
            }
        }

        let kind = match kind {
            BlockKind::Heading { level: 1 } if text == self.title && !has_title(walk) => BlockKind::Title,
            BlockKind::Heading { .. } if matches!(walk.blocks.last(), Some(b) if b.kind == BlockKind::Title) => {
                BlockKind::Subtitle
            }
            other => other,
        };

        walk.push(ContentBlock::new(kind, image_placeholders(&element.html())));
    }

    fn unstructured(&self, element: ElementRef<'_>, walk: &mut Walk) {
        let containers: Vec<String> = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| rules::CONTAINER_TAGS.contains(&tag_name(*child).as_str()))
            .map(element_text)
            .filter(|text| text.trim().chars().count() > self.container_min_chars)
            .collect();

        if !containers.is_empty() {
            for text in &containers {
                for segment in split_blank_lines(text) {
                    walk.push_paragraph(segment);
                }
            }
            return;
        }

        let text = element_text(element);
        let mut segments = split_blank_lines(&text);
        if segments.len() <= 1 {
            segments = split_sentences(text.trim());
        }
        for segment in segments {
            walk.push_paragraph(segment);
        }
    }

    /// Direct child `<img>` and `<figure>` elements, appended after the blocks.
    fn standalone(&self, element: ElementRef<'_>, walk: &mut Walk) {
        for child in element.children().filter_map(ElementRef::wrap) {
            match tag_name(child).as_str() {
                "img" => {
                    if let Some(record) = self.images.accept(child, walk.offset, SweepMode::Targeted) {
                        let block = ContentBlock::figure(figure_markup(&record), &record.src);
                        walk.images.insert(record);
                        walk.push(block);
                    }
                }
                "figure" => {
                    if let Some(img) = child.select(&IMAGE).next()
                        && let Some(record) = self.images.accept(img, walk.offset, SweepMode::Targeted)
                    {
                        let block = ContentBlock::figure(child.html(), &record.src);
                        walk.images.insert(record);
                        walk.push(block);
                    }
                }
                _ => {}
            }
        }
    }

    /// Last resort inside one scope: descendant divs without direct `<p>` or
    /// heading children, split on blank lines.
    fn container_sweep(&self, element: ElementRef<'_>, walk: &mut Walk) {
        for div in element.descendants().filter_map(ElementRef::wrap).skip(1) {
            if tag_name(div) != "div" || has_direct_text_block(div) {
                continue;
            }
            let text = element_text(div);
            if text.trim().chars().count() <= self.container_min_chars {
                continue;
            }
            for segment in split_blank_lines(&text) {
                walk.push_paragraph(segment);
            }
        }
    }
}

fn has_title(walk: &Walk) -> bool {
    walk.blocks.iter().any(|b| b.kind == BlockKind::Title)
}

fn has_direct_text_block(div: ElementRef<'_>) -> bool {
    div.children()
        .filter_map(ElementRef::wrap)
        .any(|child| matches!(tag_name(child).as_str(), "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"))
}

/// Maps a block tag to its kind; `None` for traversal scaffolding.
pub fn block_kind(tag: &str) -> Option<BlockKind> {
    if !rules::BLOCK_TAGS.contains(&tag) {
        return None;
    }
    Some(match tag {
        "p" => BlockKind::Paragraph,
        "blockquote" => BlockKind::Quote,
        "ul" => BlockKind::List { ordered: false },
        "ol" => BlockKind::List { ordered: true },
        heading => BlockKind::Heading { level: heading[1..].parse().unwrap_or(1) },
    })
}

/// Figure markup for a standalone image, captioned with its alt text.
pub fn figure_markup(record: &ImageRecord) -> String {
    let alt = if record.alt.is_empty() { PLACEHOLDER_ALT } else { record.alt.as_str() };
    let alt = escape_html(alt);
    format!(r#"<figure><img src="{}" alt="{alt}" /><figcaption>{alt}</figcaption></figure>"#, escape_html(&record.src))
}
