//! Word translation through a local language-model endpoint.
//!
//! [`Translator::translate`] never fails: when the model is disabled the
//! canned mock answers are used, and any request or parse failure maps to a
//! fixed placeholder. [`Translator::try_translate`] exposes the error instead.

use std::sync::LazyLock;
#[cfg(feature = "fetch")]
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{LecternError, Result};

/// First `{` through last `}`: the JSON object inside a chatty model reply.
static JSON_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Context characters quoted in a mock answer.
const MOCK_CONTEXT_CHARS: usize = 50;

/// Translation endpoint settings.
#[derive(Debug, Clone)]
pub struct TranslateConfig {
    /// Generate endpoint (default: `http://localhost:11434/api/generate`).
    pub endpoint: String,
    /// Model name (default: `gemma3:12b`).
    pub model: String,
    /// When false, mock answers are returned without any request.
    pub enabled: bool,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Language the word is translated into.
    pub target_language: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "gemma3:12b".to_string(),
            enabled: true,
            timeout: 60,
            target_language: "Russian".to_string(),
        }
    }
}

/// A word's translation and explanations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub context_meaning: String,
    #[serde(default)]
    pub english_explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_example: Option<String>,
}

impl Translation {
    /// Answer used whenever the model cannot be reached or understood.
    pub fn placeholder(word: &str) -> Self {
        Self {
            translation: format!("[Translation for \"{word}\"]"),
            synonyms: Vec::new(),
            context_meaning: "Unable to get translation. Please check if the model server is running.".to_string(),
            english_explanation: "Unable to get translation. Please check if the model server is running.".to_string(),
            english_example: None,
        }
    }

    /// Canned answer for demo words, generic otherwise.
    pub fn mock(word: &str, context: &str) -> Self {
        if let Some((_, translation, meaning)) = MOCK_WORDS.iter().find(|(w, _, _)| w.eq_ignore_ascii_case(word)) {
            return Self {
                translation: translation.to_string(),
                synonyms: Vec::new(),
                context_meaning: meaning.to_string(),
                english_explanation: meaning.to_string(),
                english_example: None,
            };
        }

        let quoted: String = context.chars().take(MOCK_CONTEXT_CHARS).collect();
        Self {
            translation: format!("[Translation for \"{word}\"]"),
            synonyms: Vec::new(),
            context_meaning: format!("This word means something relevant to the context: \"{quoted}...\""),
            english_explanation: String::new(),
            english_example: None,
        }
    }
}

/// Demo vocabulary: word, translation, meaning.
const MOCK_WORDS: &[(&str, &str, &str)] = &[
    (
        "eloquent",
        "красноречивый",
        "Fluent or persuasive in speaking or writing, especially in a way that is moving or effective.",
    ),
    (
        "innovation",
        "инновация",
        "The action or process of innovating, introducing new ideas, methods, or products.",
    ),
    (
        "remarkable",
        "замечательный",
        "Worthy of attention because unusual or exceptional, notably or conspicuously unusual.",
    ),
    ("ubiquitous", "вездесущий", "Present, appearing, or found everywhere; omnipresent."),
    (
        "ambiguous",
        "двусмысленный",
        "Open to more than one interpretation; having a double meaning; unclear or inexact.",
    ),
];

/// Builds the model prompt for one word.
pub fn build_prompt(word: &str, context: &str, language: &str) -> String {
    format!(
        r#"Translate the English word "{word}" into {language}. The word appears in this context:
"{context}"

Answer with JSON in exactly this format:
{{
  "translation": "the word in {language}",
  "synonyms": ["up to three English synonyms"],
  "contextMeaning": "what the word means in this context, in {language}, 1-2 sentences",
  "englishExplanation": "what the word means, in English, 1-2 sentences",
  "englishExample": "one English example sentence using the word"
}}"#
    )
}

/// Pulls the model's text out of an endpoint reply and parses the JSON
/// object embedded in it.
///
/// Accepts both the generate shape (`response`) and the chat shape
/// (`message.content`).
pub fn parse_model_reply(reply: &serde_json::Value) -> Result<Translation> {
    let text = reply
        .get("response")
        .and_then(|v| v.as_str())
        .or_else(|| reply.pointer("/message/content").and_then(|v| v.as_str()))
        .ok_or_else(|| LecternError::Translation("reply has no response text".to_string()))?;

    let object = JSON_OBJECT
        .find(text)
        .ok_or_else(|| LecternError::Translation("reply contains no JSON object".to_string()))?;

    Ok(serde_json::from_str(object.as_str())?)
}

/// Client for the translation endpoint.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct Translator {
    config: TranslateConfig,
    client: reqwest::Client,
}

#[cfg(feature = "fetch")]
impl Translator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(LecternError::HttpError)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &TranslateConfig {
        &self.config
    }

    /// Translates `word` as used in `context`. Never fails; see module docs.
    pub async fn translate(&self, word: &str, context: &str) -> Translation {
        if !self.config.enabled {
            return Translation::mock(word, context);
        }

        match self.try_translate(word, context).await {
            Ok(translation) => translation,
            Err(e) => {
                tracing::warn!(word, error = %e, "translation failed, using placeholder");
                Translation::placeholder(word)
            }
        }
    }

    /// Asks the model, surfacing every failure.
    pub async fn try_translate(&self, word: &str, context: &str) -> Result<Translation> {
        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": build_prompt(word, context, &self.config.target_language),
            "stream": false,
        });

        tracing::debug!(word, endpoint = %self.config.endpoint, "requesting translation");
        let response = self.client.post(&self.config.endpoint).json(&body).send().await.map_err(|e| {
            if e.is_timeout() { LecternError::Timeout { timeout: self.config.timeout } } else { LecternError::HttpError(e) }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LecternError::HttpStatus { status: status.as_u16() });
        }

        let reply: serde_json::Value = response.json().await?;
        parse_model_reply(&reply)
    }
}
