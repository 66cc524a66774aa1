use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use petfriends_core::Credentials;
use serde::{Deserialize, Serialize};

/// Suite configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. petfriends.yaml file (if exists)
/// 3. Environment variables with PF_ prefix (always wins)
///
/// Without `base_url` every test runs against its own in-process fake,
/// and the default credentials are the fake's demo account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Live service root, e.g. `https://petfriends.skillfactory.ru`.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_email")]
    pub email: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Fixture image directory; relative paths resolve against the suite
    /// crate root.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Global per-request timeout. Unset keeps the transport's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_email() -> String {
    petfriends_mock::DEMO_EMAIL.to_string()
}

fn default_password() -> String {
    petfriends_mock::DEMO_PASSWORD.to_string()
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("tests/images")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            email: default_email(),
            password: default_password(),
            images_dir: default_images_dir(),
            timeout_secs: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from defaults, `petfriends.yaml` and `PF_*`
    /// environment variables.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("petfriends.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path.as_ref()))
            .merge(Env::prefixed("PF_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "base_url must start with http:// or https://, got: '{url}'"
                )));
            }
        }

        if self.email.is_empty() {
            return Err(ConfigError::Validation(
                "email is required. Set PF_EMAIL or configure it in petfriends.yaml.".into(),
            ));
        }

        if self.password.is_empty() {
            return Err(ConfigError::Validation(
                "password is required. Set PF_PASSWORD or configure it in petfriends.yaml.".into(),
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Validation("timeout_secs cannot be 0".into()));
        }

        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.email, &self.password)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Fixture directory, with a relative `images_dir` joined onto `root`.
    pub fn images_dir_in(&self, root: &Path) -> PathBuf {
        if self.images_dir.is_absolute() {
            self.images_dir.clone()
        } else {
            root.join(&self.images_dir)
        }
    }
}
