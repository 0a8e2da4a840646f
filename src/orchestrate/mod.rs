// src/orchestrate/mod.rs
//! Runs extract, transform and load as external processes, one news source
//! at a time, moving files between the stage directories.

pub mod config;

pub use config::{PipelineConfig, StageConfig};

use crate::stage::{Stage, StageDirs, StageHandoff};
use glob::{glob, Pattern};
use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read pipeline config {path}: {source}")]
    ConfigIo { path: PathBuf, source: io::Error },

    #[error("invalid pipeline config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("{0} stage has no program configured")]
    EmptyProgram(Stage),

    #[error("{stage} for {source_uid}: failed to start {program}: {source}")]
    Spawn {
        stage: Stage,
        source_uid: String,
        program: String,
        source: io::Error,
    },

    #[error("{stage} for {source_uid} exited with {status}")]
    StageFailed {
        stage: Stage,
        source_uid: String,
        status: ExitStatus,
    },

    #[error("{stage} for {source_uid} left no output at {path}")]
    MissingOutput {
        stage: Stage,
        source_uid: String,
        path: PathBuf,
    },

    #[error("bad glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Environment variable every stage receives, pointing at the language resources.
pub const RESOURCES_ENV: &str = "NEWSETL_RESOURCES";

pub struct Orchestrator {
    config: PipelineConfig,
    dirs: StageDirs,
    resources: PathBuf,
}

impl Orchestrator {
    /// Relative `resources` is resolved here, since stages run in their own dirs.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let dirs = config.dirs();
        let resources = absolute_dir(&config.resources)?;
        debug!(resources = %resources.display(), "resolved resources dir");
        Ok(Self {
            config,
            dirs,
            resources,
        })
    }

    pub fn resources(&self) -> &Path {
        &self.resources
    }

    /// Extract every source, then transform every source, then load every
    /// source. The first failure stops the run.
    pub fn run(&self) -> Result<(), PipelineError> {
        for stage in Stage::ALL {
            fs::create_dir_all(self.dirs.dir(stage))?;
        }
        for stage in Stage::ALL {
            info!("starting {} process", stage);
            for source_uid in &self.config.sources {
                let handoff = self.dirs.handoff(stage, source_uid);
                match stage {
                    Stage::Extract => self.extract(&handoff)?,
                    Stage::Transform => self.transform(&handoff)?,
                    Stage::Load => self.load(&handoff)?,
                }
            }
        }
        info!("pipeline finished");
        Ok(())
    }

    #[instrument(level = "info", skip(self, h), fields(source = %h.source_uid))]
    fn extract(&self, h: &StageHandoff) -> Result<(), PipelineError> {
        self.run_stage(h, &[h.source_uid.clone()])?;

        let produced = find_extract_output(&h.workdir, &h.source_uid)?.ok_or_else(|| {
            PipelineError::MissingOutput {
                stage: h.stage,
                source_uid: h.source_uid.clone(),
                path: h.workdir.join(format!("{}*", h.source_uid)),
            }
        })?;
        if let Some(dest) = &h.handoff {
            move_file(&produced, dest)?;
        }
        Ok(())
    }

    #[instrument(level = "info", skip(self, h), fields(source = %h.source_uid))]
    fn transform(&self, h: &StageHandoff) -> Result<(), PipelineError> {
        let (Some(input), Some(output)) = (&h.input, &h.output) else {
            return Ok(());
        };
        self.run_stage(
            h,
            &[file_name(input), "--output".to_string(), file_name(output)],
        )?;

        if !output.exists() {
            return Err(PipelineError::MissingOutput {
                stage: h.stage,
                source_uid: h.source_uid.clone(),
                path: output.clone(),
            });
        }
        fs::remove_file(input)?;
        if let Some(dest) = &h.handoff {
            move_file(output, dest)?;
        }
        Ok(())
    }

    #[instrument(level = "info", skip(self, h), fields(source = %h.source_uid))]
    fn load(&self, h: &StageHandoff) -> Result<(), PipelineError> {
        let Some(input) = &h.input else {
            return Ok(());
        };
        self.run_stage(h, &[file_name(input)])?;
        fs::remove_file(input)?;
        Ok(())
    }

    /// Run the stage's program in its workdir with `args` appended.
    fn run_stage(&self, h: &StageHandoff, args: &[String]) -> Result<(), PipelineError> {
        let program = &self.config.stage(h.stage).program;
        let (bin, fixed) = program
            .split_first()
            .ok_or(PipelineError::EmptyProgram(h.stage))?;

        debug!(stage = %h.stage, bin = %bin, ?fixed, ?args, cwd = %h.workdir.display(), "spawning");
        let status = Command::new(bin)
            .args(fixed)
            .args(args)
            .current_dir(&h.workdir)
            .env(RESOURCES_ENV, &self.resources)
            .status()
            .map_err(|source| PipelineError::Spawn {
                stage: h.stage,
                source_uid: h.source_uid.clone(),
                program: bin.clone(),
                source,
            })?;

        if !status.success() {
            return Err(PipelineError::StageFailed {
                stage: h.stage,
                source_uid: h.source_uid.clone(),
                status,
            });
        }
        Ok(())
    }
}

fn absolute_dir(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The file extract left behind for `source_uid`: anything under `dir`
/// whose name starts with the uid. With several matches the last one by
/// path order wins.
pub fn find_extract_output(dir: &Path, source_uid: &str) -> Result<Option<PathBuf>, PipelineError> {
    let pattern = format!(
        "{}/**/{}*",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(source_uid)
    );
    let mut matches: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    matches.sort();

    if matches.len() > 1 {
        warn!(source_uid, count = matches.len(), "several extract outputs, using the last");
    }
    Ok(matches.pop())
}

/// Rename, falling back to copy + remove across filesystems.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::rename(from, to).is_err() {
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    info!("moved {} -> {}", from.display(), to.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::init_test_logging;
    use anyhow::Result;
    use tempfile::tempdir;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    fn config(root: &Path, extract: &str, transform: &str, load: &str) -> PipelineConfig {
        PipelineConfig {
            sources: vec!["eluniversal".into(), "elpais".into()],
            resources: root.join("resources"),
            extract: StageConfig {
                dir: root.join("extract"),
                program: sh(extract),
            },
            transform: StageConfig {
                dir: root.join("transform"),
                program: sh(transform),
            },
            load: StageConfig {
                dir: root.join("load"),
                program: sh(load),
            },
        }
    }

    // With `sh -c script a b`, the appended args arrive as $0, $1, ...
    const EXTRACT: &str = r#"printf 'url,title,body\n' > "$0_2024_01_01_articles.csv""#;
    const TRANSFORM: &str = r#"cp "$0" "$2""#;
    const LOAD: &str = r#"cp "$0" "../loaded_$0""#;

    #[test]
    fn test_full_run_moves_files_between_stages() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        Orchestrator::new(config(tmp.path(), EXTRACT, TRANSFORM, LOAD))?.run()?;

        for uid in ["eluniversal", "elpais"] {
            assert!(tmp.path().join(format!("loaded_{uid}.csv")).exists());
            assert!(!tmp.path().join("load").join(format!("{uid}.csv")).exists());
            assert!(!tmp.path().join("transform").join(format!("{uid}_.csv")).exists());
            assert!(!tmp
                .path()
                .join("transform")
                .join(format!("clean_{uid}_.csv"))
                .exists());
        }
        Ok(())
    }

    #[test]
    fn test_stages_receive_absolute_resources_dir() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        let mut cfg = config(
            tmp.path(),
            EXTRACT,
            r#"printf '%s' "$NEWSETL_RESOURCES" > "../seen_$0.txt" && cp "$0" "$2""#,
            LOAD,
        );
        cfg.resources = PathBuf::from("resources");

        let orch = Orchestrator::new(cfg)?;
        assert!(orch.resources().is_absolute());
        assert_eq!(orch.resources(), std::env::current_dir()?.join("resources"));
        orch.run()?;

        let seen = fs::read_to_string(tmp.path().join("seen_elpais_.csv.txt"))?;
        assert_eq!(PathBuf::from(seen), orch.resources());
        Ok(())
    }

    #[test]
    fn test_failed_stage_aborts_pipeline() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        let orch = Orchestrator::new(config(tmp.path(), EXTRACT, "exit 3", LOAD))?;

        match orch.run() {
            Err(PipelineError::StageFailed {
                stage,
                source_uid,
                status,
            }) => {
                assert_eq!(stage, Stage::Transform);
                assert_eq!(source_uid, "eluniversal");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        // nothing reached the load stage
        assert!(!tmp.path().join("loaded_eluniversal.csv").exists());
        assert!(tmp.path().join("transform/elpais_.csv").exists());
        Ok(())
    }

    #[test]
    fn test_extract_without_output() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        let orch = Orchestrator::new(config(tmp.path(), "true", TRANSFORM, LOAD))?;
        assert!(matches!(
            orch.run(),
            Err(PipelineError::MissingOutput {
                stage: Stage::Extract,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_transform_without_output() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        let orch = Orchestrator::new(config(tmp.path(), EXTRACT, "true", LOAD))?;
        assert!(matches!(
            orch.run(),
            Err(PipelineError::MissingOutput {
                stage: Stage::Transform,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_program_is_spawn_error() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        let mut cfg = config(tmp.path(), EXTRACT, TRANSFORM, LOAD);
        cfg.extract.program = vec!["definitely-not-a-real-binary-xyz".into()];
        assert!(matches!(
            Orchestrator::new(cfg)?.run(),
            Err(PipelineError::Spawn { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_find_extract_output_nested() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        fs::create_dir_all(tmp.path().join("out"))?;
        fs::write(tmp.path().join("out/elpais_2024.csv"), "x")?;
        fs::write(tmp.path().join("other.csv"), "x")?;

        let found = find_extract_output(tmp.path(), "elpais")?;
        assert!(found.is_some_and(|p| p.ends_with("out/elpais_2024.csv")));
        assert!(find_extract_output(tmp.path(), "eluniversal")?.is_none());
        Ok(())
    }
}
