//! Content image filtering, URL resolution, and deduplication.
//!
//! [`ImageProcessor::process`] is the single routine that turns an `<img>`
//! node into an [`ImageRecord`]. It runs in two modes: [`SweepMode::Targeted`]
//! for images met during block extraction, and [`SweepMode::Broad`] for the
//! last-resort sweep over the whole document, which trusts declared size and
//! skips the decorative-name checks.

use std::fmt;

use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;
use crate::parse::compile_selector;
use crate::rules;

/// An image kept as article content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Absolute URL.
    pub src: String,
    /// Alternative text, empty when the markup had none.
    pub alt: String,
    /// Character offset into the emitted content where the image was met.
    pub position: usize,
}

/// Why an image was not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// None of the source attributes held a usable URL.
    NoSource,
    /// The URL contains a decorative marker.
    Decorative { marker: String, reason: String },
    /// Vector graphics are never article photos.
    Vector,
    /// Sits inside navigation, header, footer or sidebar chrome.
    NonContentRegion,
    /// Declared width and height are both small.
    TooSmall { width: u32, height: u32 },
    /// The broad sweep only keeps images with a large declared size.
    NotLargeEnough,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoSource => write!(f, "no usable source attribute"),
            Rejection::Decorative { marker, reason } => write!(f, "decorative ({reason}, matched {marker:?})"),
            Rejection::Vector => write!(f, "svg image"),
            Rejection::NonContentRegion => write!(f, "inside page chrome"),
            Rejection::TooSmall { width, height } => write!(f, "too small ({width}x{height})"),
            Rejection::NotLargeEnough => write!(f, "no large declared size"),
        }
    }
}

/// Which filter set [`ImageProcessor::process`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Images met while extracting blocks.
    Targeted,
    /// Last-resort sweep over every image in the document.
    Broad,
}

/// Filter tables for image processing.
#[derive(Debug, Clone)]
pub struct ImageRules {
    /// Attributes checked for a source URL, in order.
    pub source_attrs: Vec<String>,
    /// URL substring mapped to the reason it marks decoration.
    pub decorative_markers: Vec<(String, String)>,
    /// Selectors for disqualifying ancestors.
    pub non_content_ancestors: Vec<String>,
    /// Declared width and height both at or under this are dropped.
    pub small_max: u32,
    /// Broad sweep width floor (exclusive).
    pub sweep_min_width: u32,
    /// Broad sweep height floor (exclusive).
    pub sweep_min_height: u32,
}

impl Default for ImageRules {
    fn default() -> Self {
        Self {
            source_attrs: rules::IMAGE_SOURCE_ATTRS.iter().map(|s| s.to_string()).collect(),
            decorative_markers: rules::DECORATIVE_MARKERS
                .iter()
                .map(|(marker, reason)| (marker.to_string(), reason.to_string()))
                .collect(),
            non_content_ancestors: rules::NON_CONTENT_ANCESTORS.iter().map(|s| s.to_string()).collect(),
            small_max: rules::SMALL_IMAGE_MAX_PX,
            sweep_min_width: rules::SWEEP_MIN_WIDTH_PX,
            sweep_min_height: rules::SWEEP_MIN_HEIGHT_PX,
        }
    }
}

/// Turns `<img>` nodes into [`ImageRecord`]s for one page.
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    origin: String,
    rules: ImageRules,
    ancestors: Selector,
}

impl ImageProcessor {
    /// Creates a processor resolving relative URLs against `page_url`'s origin.
    pub fn new(page_url: &Url, rules: ImageRules) -> Result<Self> {
        let ancestors = compile_selector(&rules.non_content_ancestors.join(", "))?;
        Ok(Self { origin: page_url.origin().ascii_serialization(), rules, ancestors })
    }

    /// The scheme + host (+ port) prefix used for relative URLs.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Decides whether `img` is content and, if so, builds its record.
    pub fn process(
        &self, img: ElementRef<'_>, position: usize, mode: SweepMode,
    ) -> std::result::Result<ImageRecord, Rejection> {
        let raw = self.source_of(img).ok_or(Rejection::NoSource)?;

        if mode == SweepMode::Targeted {
            if let Some((marker, reason)) = self.rules.decorative_markers.iter().find(|(m, _)| raw.contains(m.as_str())) {
                return Err(Rejection::Decorative { marker: marker.clone(), reason: reason.clone() });
            }
            if raw.ends_with(".svg") {
                return Err(Rejection::Vector);
            }
        }

        if self.in_non_content_region(img) {
            return Err(Rejection::NonContentRegion);
        }

        let width = declared_size(img, "width");
        let height = declared_size(img, "height");
        match mode {
            SweepMode::Targeted => {
                if let (Some(w), Some(h)) = (width, height)
                    && w <= self.rules.small_max
                    && h <= self.rules.small_max
                {
                    return Err(Rejection::TooSmall { width: w, height: h });
                }
            }
            SweepMode::Broad => {
                let wide = width.is_some_and(|w| w > self.rules.sweep_min_width);
                let tall = height.is_some_and(|h| h > self.rules.sweep_min_height);
                if !wide && !tall {
                    return Err(Rejection::NotLargeEnough);
                }
            }
        }

        let alt = img.value().attr("alt").unwrap_or_default().to_string();
        Ok(ImageRecord { src: resolve_src(raw, &self.origin), alt, position })
    }

    /// Like [`Self::process`] but logs the rejection and discards it.
    pub fn accept(&self, img: ElementRef<'_>, position: usize, mode: SweepMode) -> Option<ImageRecord> {
        match self.process(img, position, mode) {
            Ok(record) => Some(record),
            Err(reason) => {
                tracing::trace!(%reason, position, "image rejected");
                None
            }
        }
    }

    /// First usable source attribute. Empty values and inline `data:`
    /// placeholders fall through to the lazy-load attributes.
    fn source_of<'a>(&self, img: ElementRef<'a>) -> Option<&'a str> {
        self.rules
            .source_attrs
            .iter()
            .filter_map(|attr| img.value().attr(attr))
            .map(str::trim)
            .find(|src| !src.is_empty() && !src.starts_with("data:"))
    }

    fn in_non_content_region(&self, img: ElementRef<'_>) -> bool {
        img.ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| self.ancestors.matches(&ancestor))
    }
}

/// Reads `attr`, falling back to `data-{attr}`, as a leading integer.
fn declared_size(img: ElementRef<'_>, attr: &str) -> Option<u32> {
    let value = img
        .value()
        .attr(attr)
        .or_else(|| img.value().attr(&format!("data-{attr}")))?;
    parse_dimension(value)
}

/// Parses the leading digits of a dimension attribute (`"400"`, `"400px"`).
pub fn parse_dimension(value: &str) -> Option<u32> {
    let digits: String = value.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Makes an image URL absolute against a page origin.
///
/// - `//cdn/x.png` becomes `https://cdn/x.png`
/// - `/x.png` becomes `{origin}/x.png`
/// - `x.png` becomes `{origin}/x.png`
/// - absolute `http(s)` URLs are kept
pub fn resolve_src(src: &str, origin: &str) -> String {
    let lower = src.to_ascii_lowercase();
    if src.starts_with("//") {
        format!("https:{src}")
    } else if lower.starts_with("http://") || lower.starts_with("https://") {
        src.to_string()
    } else if src.starts_with('/') {
        format!("{origin}{src}")
    } else {
        format!("{origin}/{src}")
    }
}

/// Ordered image list with first-occurrence-wins deduplication on `src`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    records: Vec<ImageRecord>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends unless a record with the same `src` is already present.
    pub fn insert(&mut self, record: ImageRecord) -> bool {
        if self.records.iter().any(|existing| existing.src == record.src) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Inserts each record in order.
    pub fn extend<I: IntoIterator<Item = ImageRecord>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }

    /// Merges another set, keeping this set's records on conflicts.
    pub fn merge(&mut self, other: ImageSet) {
        self.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the set, ordering records by position (stable, so ties keep
    /// their discovery order).
    pub fn into_sorted(mut self) -> Vec<ImageRecord> {
        self.records.sort_by_key(|record| record.position);
        self.records
    }
}
