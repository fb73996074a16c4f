//! Plain-text helpers: paragraph and sentence splitting, escaping, pasted
//! text import, and the reading-view word utilities.
//!
//! The splitters here are shared by the unstructured extraction strategy and
//! by [`import_text`], so pasted text and div soup become paragraphs the same
//! way.
//!
//! # Example
//!
//! ```rust
//! use lectern_core::text::{highlight_words, paragraphs_from_text, word_context};
//!
//! let html = paragraphs_from_text("First paragraph.\n\nSecond <one>.");
//! assert_eq!(html, "<p>First paragraph.</p><p>Second &lt;one&gt;.</p>");
//!
//! assert_eq!(word_context("The quick brown fox", "BROWN", 4), "ick brown fox");
//! assert_eq!(highlight_words("A fox.", &["fox"]), r#"A <span class="highlighted-word">fox</span>."#);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::library::Article;

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\r?\n|\r)\s*(?:\r?\n|\r)").unwrap());

/// Terminal punctuation, whitespace, then a capital letter. The punctuation
/// stays with the left sentence and the capital starts the right one.
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+[A-Z]").unwrap());

static TOKEN_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\s+|[.,!?;:"]"#).unwrap());

/// Default title for pasted text imported without one.
pub const DEFAULT_TEXT_TITLE: &str = "text";

/// Splits on blank lines, dropping empty segments. Segments are trimmed.
pub fn split_blank_lines(text: &str) -> Vec<&str> {
    BLANK_LINE.split(text).map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Splits on sentence boundaries (`.`, `!` or `?`, whitespace, capital letter).
///
/// Only ASCII capitals start a sentence, so scripts without case never split.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for found in SENTENCE_BREAK.find_iter(text) {
        // Both the punctuation and the capital are single-byte ASCII.
        sentences.push(&text[start..found.start() + 1]);
        start = found.end() - 1;
    }
    sentences.push(&text[start..]);
    sentences.into_iter().map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Escapes text for use in element content or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps one segment of plain text in an escaped `<p>`.
pub fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text.trim()))
}

/// Turns pasted plain text into paragraph markup, one `<p>` per blank-line
/// separated block.
pub fn paragraphs_from_text(text: &str) -> String {
    split_blank_lines(text).into_iter().map(paragraph).collect()
}

/// Builds an [`Article`] from pasted text.
///
/// An empty title falls back to [`DEFAULT_TEXT_TITLE`].
pub fn import_text(title: &str, text: &str, source: Option<String>) -> Article {
    let title = title.trim();
    let title = if title.is_empty() { DEFAULT_TEXT_TITLE } else { title };
    Article::new(title, paragraphs_from_text(text), source, Vec::new())
}

/// Byte range of the first case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return None;
    }

    for (start, _) in haystack.char_indices() {
        let mut chars = haystack[start..].char_indices();
        let mut end = start;
        let hit = needle.iter().all(|n| match chars.next() {
            Some((i, c)) => {
                end = start + i + c.len_utf8();
                c.to_lowercase().eq(n.to_lowercase())
            }
            None => false,
        });
        if hit {
            return Some((start, end));
        }
    }
    None
}

/// Text around the first case-insensitive occurrence of `word`: up to `range`
/// characters on each side plus the match itself. Empty when `word` is absent.
pub fn word_context(text: &str, word: &str, range: usize) -> String {
    let Some((start, end)) = find_ignore_case(text, word) else {
        return String::new();
    };

    let before: Vec<char> = text[..start].chars().collect();
    let lead: String = before[before.len().saturating_sub(range)..].iter().collect();
    let tail: String = text[end..].chars().take(range).collect();
    format!("{lead}{}{tail}", &text[start..end])
}

/// Wraps every token that matches one of `words` (case-insensitive, whole
/// token) in `<span class="highlighted-word">`. Separators are kept as-is.
pub fn highlight_words<S: AsRef<str>>(text: &str, words: &[S]) -> String {
    if words.is_empty() {
        return text.to_string();
    }
    let wanted: Vec<String> = words.iter().map(|w| w.as_ref().to_lowercase()).collect();

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let push_token = |out: &mut String, token: &str| {
        if !token.is_empty() && wanted.contains(&token.to_lowercase()) {
            out.push_str(r#"<span class="highlighted-word">"#);
            out.push_str(token);
            out.push_str("</span>");
        } else {
            out.push_str(token);
        }
    };

    for sep in TOKEN_SEPARATOR.find_iter(text) {
        push_token(&mut out, &text[last..sep.start()]);
        out.push_str(sep.as_str());
        last = sep.end();
    }
    push_token(&mut out, &text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_blank_lines() {
        let text = "First.\n\nSecond\nstill second.\n   \n\nThird.\r\n\r\nFourth.";
        assert_eq!(split_blank_lines(text), ["First.", "Second\nstill second.", "Third.", "Fourth."]);
        assert!(split_blank_lines("  \n\n ").is_empty());
    }

    #[test]
    fn test_split_sentences() {
        let text = "It rained. Then it stopped! Did it? yes it did. Done";
        assert_eq!(split_sentences(text), ["It rained.", "Then it stopped!", "Did it? yes it did.", "Done"]);
    }

    #[test]
    fn test_split_sentences_without_breaks() {
        assert_eq!(split_sentences("one long run-on without capitals. at all"), ["one long run-on without capitals. at all"]);
        assert_eq!(split_sentences("Привет. Мир."), ["Привет. Мир."]);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a < b & "c" > d"#), "a &lt; b &amp; &quot;c&quot; &gt; d");
    }

    #[test]
    fn test_paragraphs_from_text() {
        assert_eq!(paragraphs_from_text("  One.  \n\nTwo.\n"), "<p>One.</p><p>Two.</p>");
        assert_eq!(paragraphs_from_text(""), "");
    }

    #[test]
    fn test_import_text_defaults_title() {
        let article = import_text("  ", "Body text.", None);
        assert_eq!(article.title, DEFAULT_TEXT_TITLE);
        assert_eq!(article.content, "<p>Body text.</p>");
        assert!(article.source.is_none());

        let article = import_text("Notes", "Body.", Some("clipboard".into()));
        assert_eq!(article.title, "Notes");
        assert_eq!(article.source.as_deref(), Some("clipboard"));
    }

    #[test]
    fn test_word_context() {
        let text = "An eloquent speaker moved the crowd.";
        assert_eq!(word_context(text, "Eloquent", 3), "An eloquent sp");
        assert_eq!(word_context(text, "crowd", 100), text);
        assert_eq!(word_context(text, "absent", 10), "");
        assert_eq!(word_context(text, "", 10), "");
    }

    #[test]
    fn test_word_context_multibyte() {
        let text = "café au lait, s'il vous plaît";
        assert_eq!(word_context(text, "AU", 2), "é au l");
    }

    #[test]
    fn test_highlight_words() {
        let text = "Innovation drives innovation, not innovations.";
        let out = highlight_words(text, &["innovation"]);
        assert_eq!(
            out,
            r#"<span class="highlighted-word">Innovation</span> drives <span class="highlighted-word">innovation</span>, not innovations."#
        );
    }

    #[test]
    fn test_highlight_no_words() {
        let words: [&str; 0] = [];
        assert_eq!(highlight_words("unchanged", &words), "unchanged");
    }
}
