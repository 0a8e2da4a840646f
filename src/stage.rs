// src/stage.rs
use std::{
    fmt,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Transform,
    Load,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Extract, Stage::Transform, Stage::Load];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Transform => "transform",
            Stage::Load => "load",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{uid}_.csv`: extract output, transform input.
pub fn raw_file_name(source_uid: &str) -> String {
    format!("{}_.csv", source_uid)
}

/// `clean_{uid}_.csv`: transform output.
pub fn clean_file_name(source_uid: &str) -> String {
    format!("clean_{}", raw_file_name(source_uid))
}

/// `{uid}.csv`: load input.
pub fn load_file_name(source_uid: &str) -> String {
    format!("{}.csv", source_uid)
}

/// Where one stage reads its input and leaves its output for one news source.
///
/// `input` is `None` for extract, which only receives the source uid.
/// `handoff` is where the orchestrator moves `output` for the next stage to
/// pick up; `None` once the data has been loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageHandoff {
    pub stage: Stage,
    pub source_uid: String,
    pub workdir: PathBuf,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub handoff: Option<PathBuf>,
}

/// Working directories of the three stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDirs {
    pub extract: PathBuf,
    pub transform: PathBuf,
    pub load: PathBuf,
}

impl StageDirs {
    pub fn dir(&self, stage: Stage) -> &Path {
        match stage {
            Stage::Extract => &self.extract,
            Stage::Transform => &self.transform,
            Stage::Load => &self.load,
        }
    }

    pub fn handoff(&self, stage: Stage, source_uid: &str) -> StageHandoff {
        let workdir = self.dir(stage).to_path_buf();
        let (input, output, handoff) = match stage {
            // Extract names its own output; the orchestrator finds it by prefix.
            Stage::Extract => (None, None, Some(self.transform.join(raw_file_name(source_uid)))),
            Stage::Transform => (
                Some(self.transform.join(raw_file_name(source_uid))),
                Some(self.transform.join(clean_file_name(source_uid))),
                Some(self.load.join(load_file_name(source_uid))),
            ),
            Stage::Load => (Some(self.load.join(load_file_name(source_uid))), None, None),
        };
        StageHandoff {
            stage,
            source_uid: source_uid.to_string(),
            workdir,
            input,
            output,
            handoff,
        }
    }
}
