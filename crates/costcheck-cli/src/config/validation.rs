use crate::config::VerifyConfig;
use crate::error::{ConfigError, Result};

/// Validate that a base URL is absolute http(s) with a host.
pub fn validate_base_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));

    match rest {
        Some(host) if !host.trim_start_matches('/').is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidValue {
            field: "baseUrl".to_string(),
            value: url.to_string(),
            hint: "Use an absolute URL such as http://localhost:5173".to_string(),
        }
        .into()),
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: field.to_string(),
            hint: format!("'{field}' cannot be empty"),
        }
        .into());
    }
    Ok(())
}

fn require_positive(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            hint: "Must be greater than zero".to_string(),
        }
        .into());
    }
    Ok(())
}

impl VerifyConfig {
    /// Validate configuration for logical consistency.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a `ConfigError`.
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.base_url)?;

        require_text("tokenKey", &self.token_key)?;
        require_text("tabText", &self.tab_text)?;
        require_text("sectionText", &self.section_text)?;
        require_text("expectedNote", &self.expected_note)?;

        require_positive("tabTimeoutMs", self.tab_timeout_ms)?;
        require_positive("expectTimeoutMs", self.expect_timeout_ms)?;
        require_positive("windowWidth", u64::from(self.window_width))?;
        require_positive("windowHeight", u64::from(self.window_height))?;

        if self.out_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "outDir".to_string(),
                hint: "Use \".\" to write screenshots to the working directory".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
