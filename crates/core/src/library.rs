//! Saved articles and vocabulary, persisted as one JSON file.
//!
//! Both lists keep insertion order. Records get opaque UUID ids and RFC 3339
//! timestamps on creation; field names serialize in camelCase so a library
//! file reads the same as the HTTP responses.
//!
//! # Example
//!
//! ```rust
//! use lectern_core::library::{Article, Library, VocabularyWord};
//! use lectern_core::translate::Translation;
//!
//! let mut library = Library::default();
//! let article = Article::new("Harbor Life", "<p>An eloquent speech.</p>", None, Vec::new());
//! let article_id = library.add_article(article);
//!
//! let translation = Translation::mock("eloquent", "An eloquent speech.");
//! let word = VocabularyWord::from_translation("eloquent", &translation, Some("An eloquent speech.".into()), Some(article_id.clone()));
//! library.add_word(word);
//!
//! assert!(library.find_word("ELOQUENT").is_some());
//! assert_eq!(library.words_for_article(&article_id).count(), 1);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::extract::ExtractionResult;
use crate::images::ImageRecord;
use crate::translate::Translation;
use crate::{LecternError, Result};

/// A saved article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    /// Article body markup.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date_added: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRecord>,
}

impl Article {
    /// Creates a record with a fresh id, added now.
    pub fn new(
        title: impl Into<String>, content: impl Into<String>, source: Option<String>, images: Vec<ImageRecord>,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            content: content.into(),
            source,
            date_added: OffsetDateTime::now_utc(),
            images,
        }
    }

    /// Creates a record from an extraction of `source`.
    pub fn from_extraction(result: ExtractionResult, source: impl Into<String>) -> Self {
        Self::new(result.title, result.content, Some(source.into()), result.images)
    }
}

/// A saved word with its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyWord {
    pub id: String,
    pub word: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    pub context_meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_example: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date_added: OffsetDateTime,
    /// The sentence the word was picked from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<String>,
}

impl VocabularyWord {
    /// Creates a record from a translation answer.
    pub fn from_translation(
        word: impl Into<String>, translation: &Translation, example_sentence: Option<String>, article_id: Option<String>,
    ) -> Self {
        Self {
            id: new_id(),
            word: word.into(),
            translation: translation.translation.clone(),
            synonyms: translation.synonyms.clone(),
            context_meaning: translation.context_meaning.clone(),
            english_explanation: Some(translation.english_explanation.clone()).filter(|s| !s.is_empty()),
            english_example: translation.english_example.clone(),
            date_added: OffsetDateTime::now_utc(),
            example_sentence,
            article_id,
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// All saved articles and words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    vocabulary: Vec<VocabularyWord>,
}

impl Library {
    /// Default library location: `<data dir>/lectern/library.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("lectern").join("library.json"))
    }

    /// Loads a library file. A missing file is an empty library.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no library file, starting empty");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the library, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!(path = %path.display(), articles = self.articles.len(), words = self.vocabulary.len(), "library saved");
        Ok(())
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn vocabulary(&self) -> &[VocabularyWord] {
        &self.vocabulary
    }

    /// Appends an article and returns its id.
    pub fn add_article(&mut self, article: Article) -> String {
        let id = article.id.clone();
        self.articles.push(article);
        id
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// Removes an article. Words saved from it are kept.
    pub fn remove_article(&mut self, id: &str) -> Result<Article> {
        let index = self
            .articles
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| LecternError::NotFound(id.to_string()))?;
        Ok(self.articles.remove(index))
    }

    /// Adds a word, replacing in place any entry with the same spelling
    /// (case-insensitive). Returns the id of the stored record.
    pub fn add_word(&mut self, word: VocabularyWord) -> String {
        let id = word.id.clone();
        let key = word.word.to_lowercase();
        match self.vocabulary.iter_mut().find(|w| w.word.to_lowercase() == key) {
            Some(existing) => *existing = word,
            None => self.vocabulary.push(word),
        }
        id
    }

    pub fn word(&self, id: &str) -> Option<&VocabularyWord> {
        self.vocabulary.iter().find(|w| w.id == id)
    }

    /// Case-insensitive lookup by spelling.
    pub fn find_word(&self, text: &str) -> Option<&VocabularyWord> {
        let key = text.to_lowercase();
        self.vocabulary.iter().find(|w| w.word.to_lowercase() == key)
    }

    pub fn contains_word(&self, text: &str) -> bool {
        self.find_word(text).is_some()
    }

    /// Words saved while reading the given article, in insertion order.
    pub fn words_for_article<'a>(&'a self, article_id: &'a str) -> impl Iterator<Item = &'a VocabularyWord> + 'a {
        self.vocabulary.iter().filter(move |w| w.article_id.as_deref() == Some(article_id))
    }

    pub fn remove_word(&mut self, id: &str) -> Result<VocabularyWord> {
        let index = self
            .vocabulary
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| LecternError::NotFound(id.to_string()))?;
        Ok(self.vocabulary.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn word(text: &str, article_id: Option<&str>) -> VocabularyWord {
        VocabularyWord::from_translation(text, &Translation::mock(text, "ctx"), None, article_id.map(String::from))
    }

    #[test]
    fn test_article_ids_are_unique() {
        let a = Article::new("A", "<p>a</p>", None, Vec::new());
        let b = Article::new("A", "<p>a</p>", None, Vec::new());
        assert_ne!(a.id, b.id);
        assert_eq!(Uuid::parse_str(&a.id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_article_crud_keeps_order() {
        let mut library = Library::default();
        let first = library.add_article(Article::new("First", "", None, Vec::new()));
        let second = library.add_article(Article::new("Second", "", None, Vec::new()));
        let third = library.add_article(Article::new("Third", "", None, Vec::new()));

        assert_eq!(library.article(&second).unwrap().title, "Second");
        library.remove_article(&second).unwrap();

        let ids: Vec<_> = library.articles().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, [first.as_str(), third.as_str()]);
        assert!(matches!(library.remove_article(&second), Err(LecternError::NotFound(_))));
    }

    #[test]
    fn test_add_word_replaces_same_spelling() {
        let mut library = Library::default();
        library.add_word(word("Harbor", None));
        library.add_word(word("tide", None));
        let replacement = library.add_word(word("harbor", None));

        assert_eq!(library.vocabulary().len(), 2);
        assert_eq!(library.vocabulary()[0].id, replacement);
        assert_eq!(library.find_word("HARBOR").unwrap().word, "harbor");
        assert!(library.contains_word("Tide"));
        assert!(!library.contains_word("dock"));
    }

    #[test]
    fn test_words_for_article_and_remove() {
        let mut library = Library::default();
        let a = library.add_word(word("one", Some("art-1")));
        library.add_word(word("two", Some("art-2")));
        library.add_word(word("three", Some("art-1")));

        let words: Vec<_> = library.words_for_article("art-1").map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["one", "three"]);

        let removed = library.remove_word(&a).unwrap();
        assert_eq!(removed.word, "one");
        assert!(library.word(&a).is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let mut translation = Translation::mock("eloquent", "");
        translation.english_example = Some("She gave an eloquent toast.".into());
        let w = VocabularyWord::from_translation("eloquent", &translation, Some("ctx".into()), None);
        let json = serde_json::to_value(&w).unwrap();

        assert!(json.get("contextMeaning").is_some());
        assert!(json.get("englishExample").is_some());
        assert!(json.get("exampleSentence").is_some());
        assert!(json.get("articleId").is_none());
        let date = json.get("dateAdded").and_then(|d| d.as_str()).unwrap();
        assert!(OffsetDateTime::parse(date, &time::format_description::well_known::Rfc3339).is_ok());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let library = Library::load(&dir.path().join("absent.json")).unwrap();
        assert!(library.articles().is_empty());
        assert!(library.vocabulary().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("library.json");

        let mut library = Library::default();
        let id = library.add_article(Article::new("Saved", "<p>x</p>", Some("https://e.com".into()), Vec::new()));
        library.add_word(word("eloquent", Some(&id)));
        library.save(&path).unwrap();

        let loaded = Library::load(&path).unwrap();
        assert_eq!(loaded, library);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Library::load(&path), Err(LecternError::Serialization(_))));
    }

    #[test]
    fn test_default_path_ends_with_library_file() {
        if let Some(path) = Library::default_path() {
            assert!(path.ends_with("lectern/library.json"));
        }
    }
}
