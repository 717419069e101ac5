#![doc = "Textual patching of `KEY=value` credential files."]
use crate::error::{Error, Result};
use fophelp_common::CredentialSet;
use regex::{NoExpand, Regex};
use std::path::Path;
use tracing::debug;

/// Sets each `KEY=value` entry in `content`.
///
/// The first line starting with `KEY=` is replaced; if there is none, a new line
/// is appended. Every other line is kept verbatim, so applying the same entries
/// twice gives the same text as applying them once.
pub fn patch_env<I, K, V>(content: &str, entries: I) -> Result<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut content = content.to_owned();
    for (key, value) in entries {
        let (key, value) = (key.as_ref(), value.as_ref());
        let line = format!("{key}={value}");
        let re = Regex::new(&format!(r"(?mR)^{}=.*$", regex::escape(key)))?;
        if re.is_match(&content) {
            content = re.replacen(&content, 1, NoExpand(&line)).into_owned();
        } else {
            content.push('\n');
            content.push_str(&line);
        }
    }
    Ok(content)
}

/// Patches an existing credential file in place.
pub fn update_env_file<I, K, V>(path: impl AsRef<Path>, entries: I) -> Result<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let content = patch_env(&std::fs::read_to_string(path)?, entries)?;
    std::fs::write(path, content)?;
    debug!(path = %path.display(), "credential file updated");
    Ok(())
}

/// Writes the five credential keys into an existing credential file.
pub fn write_credentials(path: impl AsRef<Path>, credentials: &CredentialSet) -> Result<()> {
    update_env_file(path, credentials.env_entries())
}
