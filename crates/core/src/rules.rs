//! Ordered tables that drive the extraction pipeline.
//!
//! Every heuristic list lives here as data rather than as branches in the
//! traversal code. Position in a selector table is its priority rank: the
//! first entry wins ties.

/// Content container selectors, highest priority first.
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "[role=\"article\"]",
    ".article",
    ".post",
    ".content",
    ".post-content",
    "main",
    "#content",
    "#main",
    ".main-content",
    ".entry-content",
    ".story",
    ".story-body",
    ".article-body",
    ".article-content",
    ".post-body",
    ".node__content",
    ".page-content",
];

/// Narrower selectors tried when the primary candidate yields too little.
pub const NARROW_SELECTORS: &[&str] = &["article", "[role=\"article\"]", ".article-body", ".post-content"];

/// Removed from the whole document once, right after parsing.
pub const SANITIZE_DENYLIST: &[&str] = &[
    "script",
    "style",
    "svg",
    "iframe",
    ".ads",
    ".ad-container",
    ".advertisement",
    ".social-buttons",
    ".share-buttons",
    ".related-articles",
    ".recommended",
    "nav",
    "footer",
    "header > nav",
    "aside",
    ".sidebar",
];

/// Excluded when measuring a candidate, and pruned from the accepted one.
pub const CANDIDATE_DENYLIST: &[&str] = &[
    "script",
    "style",
    "nav",
    "header",
    "footer",
    ".comments",
    ".sidebar",
    "aside",
    ".ad",
    ".ads",
    ".advertisement",
    ".sharing",
    ".related",
    "form",
    ".newsletter",
];

/// Re-applied to `<body>` before the last-resort tier.
pub const BODY_DENYLIST: &[&str] = &[
    "script",
    "style",
    "nav",
    "header",
    "footer",
    ".comments",
    ".sidebar",
    "aside",
    ".ad",
    ".ads",
    ".advertisement",
    ".sharing",
    ".related",
];

/// Ancestors that disqualify an image from being article content.
pub const NON_CONTENT_ANCESTORS: &[&str] = &["header", "footer", "aside", ".sidebar", "nav", ".menu", ".navigation"];

/// Source attributes checked in order; lazy loaders park the real URL in the later ones.
pub const IMAGE_SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src", "data-original"];

/// Substring of an image URL mapped to why it is treated as decoration.
pub const DECORATIVE_MARKERS: &[(&str, &str)] = &[
    ("icon", "icon asset"),
    ("logo", "site branding"),
    ("avatar", "profile picture"),
    ("button", "interface control"),
    ("badge", "badge graphic"),
];

/// Tags emitted as blocks by the structured strategy.
pub const BLOCK_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "ul", "ol"];

/// Generic containers the unstructured strategy looks inside.
pub const CONTAINER_TAGS: &[&str] = &["div", "section"];

/// Minimum trimmed text for a candidate container to be accepted.
pub const CANDIDATE_MIN_CHARS: usize = 300;

/// Below this the primary tier is considered insufficient.
pub const SUFFICIENT_CONTENT_CHARS: usize = 200;

/// Minimum text for a child container to be split into paragraphs.
pub const CONTAINER_MIN_CHARS: usize = 100;

/// Images whose declared width and height are both at or under this are dropped.
pub const SMALL_IMAGE_MAX_PX: u32 = 100;

/// Broad sweep accepts images wider than this...
pub const SWEEP_MIN_WIDTH_PX: u32 = 300;

/// ...or taller than this.
pub const SWEEP_MIN_HEIGHT_PX: u32 = 200;

/// Joins a table into one selector group.
pub fn selector_group(table: &[&str]) -> String {
    table.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_tables_compile() {
        for table in [
            CONTENT_SELECTORS,
            NARROW_SELECTORS,
            SANITIZE_DENYLIST,
            CANDIDATE_DENYLIST,
            BODY_DENYLIST,
            NON_CONTENT_ANCESTORS,
        ] {
            for selector in table {
                assert!(Selector::parse(selector).is_ok(), "selector {selector} should parse");
            }
            assert!(Selector::parse(&selector_group(table)).is_ok());
        }
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(CONTENT_SELECTORS[0], "article");
        assert_eq!(CONTENT_SELECTORS[1], "[role=\"article\"]");
        assert!(CONTENT_SELECTORS.iter().position(|s| *s == "main") < CONTENT_SELECTORS.iter().position(|s| *s == "#content"));
    }

    #[test]
    fn test_thresholds() {
        assert!(SUFFICIENT_CONTENT_CHARS < CANDIDATE_MIN_CHARS);
        assert!(SMALL_IMAGE_MAX_PX < SWEEP_MIN_HEIGHT_PX);
    }
}
