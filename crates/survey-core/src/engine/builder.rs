//! Builder for creating and configuring SurveyEngine instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::SurveyEngine;
use crate::{
    db::Database,
    error::{Result, SurveyError},
};

/// Auth-code collisions tolerated before ticket creation gives up.
pub const DEFAULT_AUTH_CODE_ATTEMPTS: u32 = 10;

/// Builder for creating and configuring SurveyEngine instances.
#[derive(Debug, Clone)]
pub struct SurveyEngineBuilder {
    database_path: Option<PathBuf>,
    auth_code_attempts: u32,
}

impl SurveyEngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            auth_code_attempts: DEFAULT_AUTH_CODE_ATTEMPTS,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/slsurvey/slsurvey.db` or
    /// `~/.local/share/slsurvey/slsurvey.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets how many auth codes are tried per ticket before giving up.
    pub fn with_auth_code_attempts(mut self, attempts: u32) -> Self {
        self.auth_code_attempts = attempts.max(1);
        self
    }

    /// Builds the configured engine instance.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::FileSystem` if the database directory cannot be
    /// created.
    /// Returns `SurveyError::Database` if database initialization fails
    pub async fn build(self) -> Result<SurveyEngine> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SurveyError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), SurveyError>(())
        })
        .await
        .map_err(|e| SurveyError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        log::info!("Survey engine using database {}", db_path.display());
        Ok(SurveyEngine::new(db_path, self.auth_code_attempts))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("slsurvey")
            .place_data_file("slsurvey.db")
            .map_err(|e| SurveyError::XdgDirectory(e.to_string()))
    }
}

impl Default for SurveyEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
