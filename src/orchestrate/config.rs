use super::PipelineError;
use crate::stage::{Stage, StageDirs};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A stage's working directory and the argv prefix used to run it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageConfig {
    pub dir: PathBuf,
    pub program: Vec<String>,
}

impl StageConfig {
    fn new(dir: &str, program: &[&str]) -> Self {
        Self {
            dir: PathBuf::from(dir),
            program: program.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// pipeline.yaml
///
/// ```yaml
/// sources: [eluniversal, elpais]
/// resources: ./resources
/// transform:
///   dir: ./transform
///   program: [newsetl, --column, body]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sources: Vec<String>,
    /// Language resources handed to every stage as `NEWSETL_RESOURCES`.
    /// Relative paths are taken from the orchestrator's working directory.
    pub resources: PathBuf,
    pub extract: StageConfig,
    pub transform: StageConfig,
    pub load: StageConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: vec!["eluniversal".into(), "elpais".into()],
            resources: PathBuf::from("resources"),
            extract: StageConfig::new("./extract", &["python3", "main.py"]),
            transform: StageConfig::new("./transform", &["newsetl", "--column", "body"]),
            load: StageConfig::new("./load", &["python3", "main.py"]),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(path).map_err(|source| PipelineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, PipelineError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn stage(&self, stage: Stage) -> &StageConfig {
        match stage {
            Stage::Extract => &self.extract,
            Stage::Transform => &self.transform,
            Stage::Load => &self.load,
        }
    }

    pub fn dirs(&self) -> StageDirs {
        StageDirs {
            extract: self.extract.dir.clone(),
            transform: self.transform.dir.clone(),
            load: self.load.dir.clone(),
        }
    }
}
