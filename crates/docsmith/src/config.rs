use std::env;
use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DocsmithError;
use crate::workspace::WorkspacePaths;

pub const DEFAULT_FRAMEWORKS: [&str; 4] = ["android", "ios", "flutter", "reactnative"];
pub const DEFAULT_STORAGE_KEY: &str = "integrationDocs-localDocs";
pub const DEFAULT_TOKEN_ENV: &str = "DOCSMITH_TOKEN";
pub const REVIEW_URL_ENV: &str = "DOCSMITH_REVIEW_URL";

/// Workspace settings read from `.docsmith/config.yaml`. Every field has a default, so a
/// missing file is equivalent to an empty one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Framework keys the editor always shows, even when the snapshot lacks them.
    pub frameworks: Vec<String>,
    pub storage_key: String,
    pub review: ReviewConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            frameworks: DEFAULT_FRAMEWORKS.iter().map(|fw| fw.to_string()).collect(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            review: ReviewConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<Url>,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
    pub timeout_secs: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ReviewConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Bearer token from the configured environment variable, if set and non-blank.
    pub fn token(&self) -> Option<String> {
        env::var(&self.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

impl EditorConfig {
    /// Loads the workspace config and applies environment overrides.
    pub fn load(paths: &WorkspacePaths) -> Result<Self, DocsmithError> {
        let path = paths.config_file();
        let mut config = match fs::read_to_string(&path) {
            Ok(raw) => Self::from_yaml(&raw).map_err(|err| err.context(path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                Self::default()
            }
            Err(err) => return Err(err.into()),
        };
        config.apply_env_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, DocsmithError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, DocsmithError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), DocsmithError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(REVIEW_URL_ENV).filter(|value| !value.trim().is_empty()) {
            let url = Url::parse(raw.trim()).map_err(|err| {
                DocsmithError::Config(format!("{REVIEW_URL_ENV} is not a valid URL: {err}"))
            })?;
            self.review.base_url = Some(url);
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), DocsmithError> {
        if self.frameworks.iter().any(|fw| fw.trim().is_empty()) {
            return Err(DocsmithError::Config(
                "framework keys must not be blank".into(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(DocsmithError::Config("storage_key must not be blank".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let paths = WorkspacePaths::at(temp.path());
        let config = EditorConfig::load(&paths).unwrap();
        assert_eq!(config.frameworks, DEFAULT_FRAMEWORKS);
        assert_eq!(config.storage_key, "integrationDocs-localDocs");
        assert_eq!(config.review.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = EditorConfig::from_yaml(
            "frameworks: [ios]\nreview:\n  base_url: https://docs.example.com\n",
        )
        .unwrap();
        assert_eq!(config.frameworks, vec!["ios".to_string()]);
        assert_eq!(config.review.token_env, DEFAULT_TOKEN_ENV);
        assert_eq!(
            config.review.base_url.unwrap().as_str(),
            "https://docs.example.com/"
        );
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        let err = EditorConfig::from_yaml("storage_key: ''").unwrap_err();
        assert!(matches!(err, DocsmithError::Config(_)));
        let err = EditorConfig::from_yaml("frameworks: {").unwrap_err();
        assert!(matches!(err, DocsmithError::Config(_)));
    }

    #[test]
    fn env_override_replaces_base_url() {
        let mut config = EditorConfig::default();
        config
            .apply_env_overrides(|key| {
                (key == REVIEW_URL_ENV).then(|| "http://127.0.0.1:9000".to_string())
            })
            .unwrap();
        assert_eq!(
            config.review.base_url.unwrap().as_str(),
            "http://127.0.0.1:9000/"
        );

        let mut config = EditorConfig::default();
        let err = config
            .apply_env_overrides(|_| Some("not a url".to_string()))
            .unwrap_err();
        assert!(matches!(err, DocsmithError::Config(_)));
    }
}
