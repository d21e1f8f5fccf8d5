//! Webhook log configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::adapters::webhook_log::{WebhookLogOptions, DEFAULT_FILE_NAME, DEFAULT_MAX_BYTES};

use super::error::ValidationError;

/// Webhook log configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookLogConfig {
    /// Directory holding the active log and its archives
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Active log file name
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Rotation threshold in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

impl WebhookLogConfig {
    pub fn options(&self) -> WebhookLogOptions {
        WebhookLogOptions::new(&self.directory)
            .with_file_name(self.file_name.clone())
            .with_max_bytes(self.max_bytes)
    }

    /// Validate webhook log configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.directory.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("WEBHOOK_LOG__DIRECTORY"));
        }
        if self.file_name.is_empty()
            || self.file_name.contains(['/', '\\'])
            || self.file_name == "."
            || self.file_name == ".."
        {
            return Err(ValidationError::InvalidLogFileName(self.file_name.clone()));
        }
        if self.max_bytes == 0 {
            return Err(ValidationError::InvalidLogThreshold);
        }
        Ok(())
    }
}

impl Default for WebhookLogConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_name: default_file_name(),
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WebhookLogConfig::default();
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(
            config.options().active_path(),
            PathBuf::from("logs/webhooks.log")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_is_invalid() {
        let config = WebhookLogConfig {
            max_bytes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidLogThreshold));
    }

    #[test]
    fn test_file_name_with_separator_is_invalid() {
        let config = WebhookLogConfig {
            file_name: "../escape.log".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidLogFileName(_))
        ));
    }

    #[test]
    fn test_empty_directory_is_invalid() {
        let config = WebhookLogConfig {
            directory: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
