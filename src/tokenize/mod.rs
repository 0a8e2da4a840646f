//! Word tokenization backed by per-language stopword lists.
//!
//! Stopwords live on disk under `<resources>/stopwords/<language>`, one word
//! per line. They are loaded explicitly when a [`Tokenizer`] is built, so a
//! run fails up front with `ResourceUnavailable` if the list is missing.

use crate::error::{EtlError, Result};
use clap::ValueEnum;
use std::{collections::HashSet, fmt, fs, io, path::Path};
use tracing::{debug, info};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    Spanish,
    English,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Spanish => "spanish",
            Language::English => "english",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct StopWords {
    language: Language,
    words: HashSet<String>,
}

impl StopWords {
    /// Load the stopword list for `language` from `resources_dir`.
    pub fn load(resources_dir: &Path, language: Language) -> Result<Self> {
        let path = resources_dir.join("stopwords").join(language.as_str());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(EtlError::ResourceUnavailable { language, path });
            }
            Err(e) => return Err(e.into()),
        };

        let words: HashSet<String> = text
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        info!(%language, count = words.len(), "loaded stopwords");
        Ok(Self { language, words })
    }

    pub fn from_words<I, S>(language: Language, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            language,
            words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: StopWords,
}

impl Tokenizer {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    pub fn load(resources_dir: &Path, language: Language) -> Result<Self> {
        Ok(Self::new(StopWords::load(resources_dir, language)?))
    }

    pub fn language(&self) -> Language {
        self.stop_words.language()
    }

    /// Lowercased alphabetic words of `text`, stopwords removed.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .filter(|w| w.chars().all(char::is_alphabetic))
            .map(str::to_lowercase)
            .filter(|w| !self.stop_words.contains(w))
            .collect()
    }

    pub fn count(&self, text: &str) -> usize {
        let n = self.tokens(text).len();
        debug!(n, "tokenized");
        n
    }
}
