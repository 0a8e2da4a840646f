// src/transform.rs
use crate::dataset::{read_csv, Dataset};
use crate::error::{EtlError, Result};
use crate::normalize;
use crate::tokenize::{Language, Tokenizer};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Everything one transform run needs.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Raw CSV; its basename prefix names the newspaper.
    pub input: PathBuf,
    /// Text column to tokenize.
    pub column: String,
    pub resources_dir: PathBuf,
    pub language: Language,
}

/// Newspaper uid from the part of the file name before the first `_`.
///
/// A name without `_` falls back to the file stem.
pub fn extract_newspaper_uid(path: &Path) -> Result<String> {
    let invalid = || EtlError::InvalidFilename(path.display().to_string());
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;

    let uid = match name.split_once('_') {
        Some((prefix, _)) => prefix,
        None => path.file_stem().and_then(|s| s.to_str()).unwrap_or(name),
    };
    if uid.is_empty() {
        return Err(invalid());
    }
    info!("newspaper uid detected: {}", uid);
    Ok(uid.to_string())
}

/// `clean_<basename>` beside the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("clean_{}", name))
}

pub struct Transformer {
    config: TransformConfig,
    tokenizer: Tokenizer,
}

impl Transformer {
    /// Loads language resources up front; fails with `ResourceUnavailable`
    /// before any data is read if they are missing.
    pub fn new(config: TransformConfig) -> Result<Self> {
        let tokenizer = Tokenizer::load(&config.resources_dir, config.language)?;
        Ok(Self::with_tokenizer(config, tokenizer))
    }

    pub fn with_tokenizer(config: TransformConfig, tokenizer: Tokenizer) -> Self {
        Self { config, tokenizer }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    #[instrument(level = "info", skip(self), fields(input = %self.config.input.display(), column = %self.config.column))]
    pub fn run(&self) -> Result<Dataset> {
        info!("starting cleaning process");
        let dataset = read_csv(&self.config.input)?;
        let newspaper_uid = extract_newspaper_uid(&self.config.input)?;

        let dataset = normalize::add_newspaper_uid(dataset, &newspaper_uid)?;
        let dataset = normalize::extract_host(dataset)?;
        let dataset = normalize::fill_missing_titles(dataset)?;
        let dataset = normalize::generate_uid(dataset)?;
        let dataset = normalize::strip_newlines(dataset)?;
        let dataset = normalize::tokenize_and_count(dataset, &self.config.column, &self.tokenizer)?;

        info!(rows = dataset.num_rows(), "cleaning finished");
        Ok(dataset)
    }
}
