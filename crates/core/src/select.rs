//! Candidate selection: picks the container holding the article body.
//!
//! Selectors are tried in priority order; within one selector, matches are
//! tried in document order. A match is accepted when its text, measured with
//! the candidate denylist left out, exceeds the configured minimum. The first
//! acceptance wins, so table order is the only tie-break.

use ego_tree::NodeId;
use scraper::Selector;

use crate::Result;
use crate::parse::{Document, compile_selector, text_excluding};
use crate::sanitize::Sanitizer;

/// Ranked content selectors plus the local denylist used to measure them.
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    ranked: Vec<(String, Selector)>,
    denylist: Sanitizer,
    min_chars: usize,
}

/// An accepted candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Node of the accepted element.
    pub node: NodeId,
    /// Index into the selector table that matched.
    pub rank: usize,
    /// Trimmed text length in characters, denylist excluded.
    pub text_chars: usize,
}

impl CandidateSelector {
    /// Compiles the ranked table and denylist.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LecternError::HtmlParseError`] for any invalid selector.
    pub fn new<S: AsRef<str>, D: AsRef<str>>(ranked: &[S], denylist: &[D], min_chars: usize) -> Result<Self> {
        let ranked = ranked
            .iter()
            .map(|s| Ok((s.as_ref().to_string(), compile_selector(s.as_ref())?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ranked, denylist: Sanitizer::new(denylist)?, min_chars })
    }

    /// Finds the first qualifying element without modifying the document.
    pub fn select(&self, doc: &Document) -> Option<Candidate> {
        for (rank, (source, selector)) in self.ranked.iter().enumerate() {
            for element in doc.html().select(selector) {
                let text_chars = text_excluding(element, self.denylist.selector()).trim().chars().count();
                if text_chars > self.min_chars {
                    tracing::debug!(selector = %source, rank, text_chars, "content candidate accepted");
                    return Some(Candidate { node: element.id(), rank, text_chars });
                }
            }
        }
        tracing::debug!("no content candidate qualified");
        None
    }

    /// Selects a candidate and prunes the denylist from inside its subtree.
    /// Nodes outside the candidate are left alone.
    pub fn select_and_prune(&self, doc: &mut Document) -> Option<Candidate> {
        let candidate = self.select(doc)?;
        self.denylist.prune(doc, candidate.node);
        Some(candidate)
    }
}
