use super::{Config, Loader, Saver};
use crate::error::{Error, Result};
use fophelp_api::env_file::{update_env_file, write_credentials};
use fophelp_common::CredentialSet;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// An implementation of [`Loader`] and [`Saver`] for a `KEY=value` credential file.
///
/// Loading parses the file without touching the process environment. Saving
/// patches the keys in place and keeps every other line, or creates the file
/// if it does not exist yet.
pub struct EnvFileStore {
    path: PathBuf,
}

impl EnvFileStore {
    /// Create a new [`EnvFileStore`] with the given path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Writes the five credential keys only, leaving every other key untouched.
    pub fn save_credentials(&self, credentials: &CredentialSet) -> Result<()> {
        if self.path.exists() {
            write_credentials(&self.path, credentials)?;
        } else {
            write_new(&self.path, credentials.env_entries()).map_err(|e| Error::ConfigSave(e.into()))?;
        }
        Ok(())
    }
}

fn write_new(path: &Path, vars: Vec<(&'static str, String)>) -> std::io::Result<()> {
    std::fs::write(path, vars.iter().map(|(k, v)| format!("{k}={v}\n")).collect::<String>())
}

impl Loader for EnvFileStore {
    async fn load(
        &self,
    ) -> core::result::Result<Config, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let vars =
            dotenv::from_path_iter(&self.path)?.collect::<core::result::Result<HashMap<_, _>, _>>()?;
        Ok(Config::from_vars(|key| vars.get(key).cloned()))
    }
}

impl Saver for EnvFileStore {
    async fn save(
        &self,
        config: &Config,
    ) -> core::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        let vars = config.to_vars();
        if self.path.exists() {
            update_env_file(&self.path, vars)?;
        } else {
            write_new(&self.path, vars)?;
        }
        Ok(())
    }
}
