use crate::config::VerifyConfig;
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "costcheck.json";

/// Prefix of environment variables overriding config fields
/// (`COSTCHECK_BASE_URL`, `COSTCHECK_PRODUCT_ID`, ...).
pub const ENV_PREFIX: &str = "COSTCHECK_";

/// Values given on the command line. Only fields that are `Some` override
/// lower-priority sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_on_error: Option<bool>,
}

impl VerifyConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI args > environment variables > config file > defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if `config_path` is given but missing,
    /// `ConfigError::Extract` if a source has the wrong shape, and the
    /// validation errors of [`VerifyConfig::validate`].
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let config = Self::figment(config_path, overrides)?
            .extract::<Self>()
            .map_err(|e| ConfigError::Extract(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// The merged provider stack, before extraction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if `config_path` is given but missing.
    pub fn figment(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        // Keys are already camelCase field names; figment must not lowercase them again.
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .map(|key| env_key_to_field(key.as_str()).into())
                .lowercase(false),
        );

        Ok(figment.merge(Serialized::defaults(overrides)))
    }
}

/// Maps an env key (`TAB_TIMEOUT_MS`) to its field name (`tabTimeoutMs`).
fn env_key_to_field(key: &str) -> String {
    let mut parts = key.split('_').filter(|part| !part.is_empty());
    let mut field = parts.next().unwrap_or_default().to_lowercase();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            field.extend(first.to_uppercase());
            field.push_str(&chars.as_str().to_lowercase());
        }
    }
    field
}
