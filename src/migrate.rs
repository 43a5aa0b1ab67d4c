//! Applying the relational artifact against a live store.
//!
//! The generator never talks to the database itself; it invokes the
//! configured external migration tool after the artifacts are published.
//! The executor is a scoped component holding an explicit configuration
//! value. Its failure is a fatal generation-run failure, logged and
//! propagated, never retried here.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{error, info};

use crate::config::{self, MigrationSettings, SettingsError};

/// Errors invoking the external migration tool.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("failed to run migration command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("migration command `{command}` exited with {status}")]
    Failed { command: String, status: String },
}

/// Runs the configured migration commands in the output directory.
#[derive(Debug)]
pub struct MigrationExecutor {
    settings: MigrationSettings,
    dir: PathBuf,
}

impl MigrationExecutor {
    pub fn new(settings: MigrationSettings, dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            dir: dir.into(),
        }
    }

    /// Run every configured command, in order, stopping at the first
    /// failure. The connection string is passed through `DATABASE_URL`.
    pub fn apply(&self) -> Result<(), MigrationError> {
        let database_url = config::database_url()?;

        for command in &self.settings.commands {
            let rendered = command.join(" ");
            info!(command = %rendered, dir = %self.dir.display(), "applying migration step");

            let (program, args) = match command.split_first() {
                Some(parts) => parts,
                None => continue,
            };

            let status = Command::new(program)
                .args(args)
                .current_dir(&self.dir)
                .env("DATABASE_URL", &database_url)
                .envs(&self.settings.env)
                .status()
                .map_err(|source| MigrationError::Spawn {
                    command: rendered.clone(),
                    source,
                })?;

            if !status.success() {
                error!(command = %rendered, %status, "migration step failed");
                return Err(MigrationError::Failed {
                    command: rendered,
                    status: status.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
