//! Author-identity configuration (spec §1: "a simple key/value map used by
//! commit to stamp author identity" is explicitly in scope).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UgitError};

const DEFAULT_AUTHOR: &str = "Your Name <you@example.com>";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: Option<UserConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        match fs::read_to_string(config_path) {
            Ok(content) => toml::from_str(&content).map_err(|e| UgitError::Corrupt {
                hash: config_path.display().to_string(),
                reason: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(UgitError::ReadError {
                path: config_path.to_path_buf(),
                source,
            }),
        }
    }

    /// `"Name <email>"` if both are set in `[user]`, else the conventional
    /// placeholder the original tool falls back to.
    #[must_use]
    pub fn author_string(&self) -> String {
        match &self.user {
            Some(UserConfig {
                name: Some(name),
                email: Some(email),
            }) => format!("{name} <{email}>"),
            Some(UserConfig {
                name: Some(name), ..
            }) => name.clone(),
            _ => DEFAULT_AUTHOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_falls_back_to_default_author() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config")).unwrap();
        assert_eq!(config.author_string(), DEFAULT_AUTHOR);
    }

    #[test]
    fn configured_user_formats_name_and_email() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[user]\nname = \"Jane\"\nemail = \"jane@example.com\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.author_string(), "Jane <jane@example.com>");
    }

    #[test]
    fn name_only_omits_angle_brackets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[user]\nname = \"Jane\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.author_string(), "Jane");
    }
}
