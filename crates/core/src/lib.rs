pub mod blocks;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod images;
pub mod library;
pub mod parse;
pub mod reader;
pub mod render;
pub mod rewrite;
pub mod rules;
pub mod sanitize;
pub mod select;
pub mod text;
pub mod translate;

pub use blocks::{BlockKind, ContentBlock};
pub use error::{ErrorKind, LecternError, Result};
pub use extract::{ExtractConfig, ExtractionResult, Tier, extract_article};
pub use fetch::FetchConfig;
pub use fetch::{fetch_file, fetch_stdin};
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use formatters::{ArticleInfo, JsonConfig, JsonFormatter, MarkdownConfig, MarkdownFormatter, TextConfig, TextFormatter};
pub use formatters::{convert_to_json, convert_to_markdown, convert_to_text};
pub use images::{ImageRecord, ImageRules};
pub use library::{Article, Library, VocabularyWord};
pub use parse::Document;
pub use reader::{ImportResponse, Reader, ReaderConfig, ReaderConfigBuilder, parse, parse_with_url};
#[cfg(feature = "fetch")]
pub use reader::{fetch_and_parse, fetch_and_parse_with_config, import_url};
pub use render::interleave;
pub use text::{highlight_words, import_text, word_context};
pub use translate::{TranslateConfig, Translation};
#[cfg(feature = "fetch")]
pub use translate::Translator;
