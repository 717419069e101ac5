use super::{Config, Loader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An implementation of [`Loader`] that reads the process environment.
///
/// A `.env` file is loaded into the environment first, if there is one.
/// Variables already set in the environment take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    path: Option<PathBuf>,
}

impl EnvLoader {
    /// Uses `.env` in the working directory or one of its parents.
    pub fn new() -> Self {
        Self::default()
    }
    /// Uses the `.env` file at `path`.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self { path: Some(path.as_ref().to_path_buf()) }
    }
}

impl Loader for EnvLoader {
    async fn load(
        &self,
    ) -> core::result::Result<Config, Box<dyn std::error::Error + Send + Sync + 'static>> {
        match &self.path {
            Some(path) => dotenv::from_path(path)?,
            None => match dotenv::dotenv() {
                Ok(path) => debug!(path = %path.display(), "loaded .env"),
                Err(err) if err.not_found() => debug!("no .env file"),
                Err(err) => return Err(err.into()),
            },
        }
        Ok(Config::from_vars(|key| std::env::var(key).ok()))
    }
}
