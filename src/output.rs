//! Atomic publication of the rendered artifacts.
//!
//! Artifacts are staged into a temporary directory on the same filesystem
//! as the destination and renamed into place only after every file wrote
//! successfully. A failed run leaves no partial output behind; the staging
//! directory is cleaned up on drop.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::generate::{Artifacts, INPUT_SCHEMA_FILE, RELATIONAL_FILE, RUNTIME_FILE};

/// Writes the artifacts of a generation run under a target directory.
#[derive(Debug)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The destination paths of the three artifacts.
    pub fn paths(&self) -> [PathBuf; 3] {
        [
            self.dir.join(RELATIONAL_FILE),
            self.dir.join(RUNTIME_FILE),
            self.dir.join(INPUT_SCHEMA_FILE),
        ]
    }

    /// Stage and publish all artifacts. Returns the published paths.
    pub fn publish(&self, artifacts: &Artifacts) -> std::io::Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;
        let staging = tempfile::tempdir_in(&self.dir)?;

        let files = [
            (RELATIONAL_FILE, artifacts.relational.as_str()),
            (RUNTIME_FILE, artifacts.runtime.as_str()),
            (INPUT_SCHEMA_FILE, artifacts.input_schema.as_str()),
        ];

        for (name, content) in files {
            fs::write(staging.path().join(name), content)?;
        }

        let mut published = Vec::with_capacity(files.len());
        for (name, _) in files {
            let target = self.dir.join(name);
            fs::rename(staging.path().join(name), &target)?;
            published.push(target);
        }

        info!(dir = %self.dir.display(), "published generated artifacts");
        Ok(published)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
