//! Import settings loaded from TOML.
//!
//! Every field has a default, so an empty or partial file is valid:
//!
//! ```toml
//! base_url = "https://fleet.example.com/api"
//!
//! [submit]
//! batch_size = 250
//! max_batch_retries = 2
//!
//! [suggest]
//! mode = "with_sample"
//!
//! [log]
//! level = "debug"
//! format = "json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use fleet_map::{SuggestMode, SuggestOptions, SuggestScope};
use fleet_submit::{HttpClient, SubmitSettings};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{PipelineError, Result};
use crate::logging::{LogConfig, LogFormat};

/// Default base URL of the import service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Top-level settings for an import session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Base URL every endpoint path is resolved against.
    pub base_url: String,
    pub submit: SubmitSettings,
    pub suggest: SuggestSettings,
    pub log: LogSettings,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            submit: SubmitSettings::default(),
            suggest: SuggestSettings::default(),
            log: LogSettings::default(),
        }
    }
}

impl ImportSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("invalid settings: {e}")))
    }

    /// Loads settings from `path`.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let settings = Self::from_toml_str(&content)?;
                tracing::info!(path = %path.display(), "loaded settings");
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(PipelineError::Config(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    /// Writes the settings to `path`, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                PipelineError::Config(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("failed to serialize settings: {e}")))?;
        fs::write(path, content)
            .map_err(|e| PipelineError::Config(format!("failed to write {}: {e}", path.display())))
    }

    /// HTTP client for the configured service and request timeout.
    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::new(&self.base_url, self.submit.request_timeout())
            .map_err(|e| PipelineError::Config(e.to_string()))
    }
}

/// AI column suggestion settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestSettings {
    /// Ask the suggestion service after every upload.
    pub enabled: bool,
    pub mode: SuggestMode,
    /// Rows sent along in [`SuggestMode::WithSample`].
    pub sample_rows: usize,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        let options = SuggestOptions::default();
        Self {
            enabled: true,
            mode: options.mode,
            sample_rows: options.sample_rows,
        }
    }
}

impl SuggestSettings {
    pub fn options(&self, scope: SuggestScope) -> SuggestOptions {
        SuggestOptions {
            scope,
            mode: self.mode,
            sample_rows: self.sample_rows,
        }
    }
}

/// Logging settings; see [`LogConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// One of error, warn, info, debug, trace.
    pub level: String,
    pub format: LogFormat,
    pub timestamps: bool,
    pub file: Option<PathBuf>,
    /// Allow cell values in log output.
    pub log_cell_values: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            timestamps: false,
            file: None,
            log_cell_values: false,
        }
    }
}

impl LogSettings {
    pub fn to_log_config(&self) -> Result<LogConfig> {
        let level: Level = self
            .level
            .trim()
            .parse()
            .map_err(|_| PipelineError::Config(format!("unknown log level: {}", self.level)))?;
        Ok(LogConfig::default()
            .with_level(level)
            .with_format(self.format)
            .with_timestamps(self.timestamps)
            .with_log_file(self.file.clone())
            .with_log_data(self.log_cell_values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let settings = ImportSettings::from_toml_str("").unwrap();
        assert_eq!(settings, ImportSettings::default());
        assert_eq!(settings.submit.batch_size(), 500);
        assert_eq!(settings.submit.max_batch_retries, 1);
        assert!(settings.suggest.enabled);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = ImportSettings::from_toml_str(
            r#"
            base_url = "https://fleet.example.com/api"

            [submit]
            batch_size = 250

            [suggest]
            mode = "with_sample"
            sample_rows = 5

            [log]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(settings.base_url, "https://fleet.example.com/api");
        assert_eq!(settings.submit.batch_size, 250);
        assert_eq!(settings.submit.request_timeout_secs, 60);
        assert_eq!(settings.suggest.mode, SuggestMode::WithSample);

        let options = settings.suggest.options(SuggestScope::AllHeaders);
        assert_eq!(options.sample_rows, 5);
        assert_eq!(options.scope, SuggestScope::AllHeaders);

        let log = settings.log.to_log_config().unwrap();
        assert_eq!(log.level, Level::DEBUG);
        assert_eq!(log.format, LogFormat::Json);
    }

    #[test]
    fn bad_values_are_config_errors() {
        assert!(matches!(
            ImportSettings::from_toml_str("[submit]\nbatch_size = \"many\""),
            Err(PipelineError::Config(_))
        ));
        let log = LogSettings {
            level: "loud".into(),
            ..LogSettings::default()
        };
        assert!(matches!(log.to_log_config(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn http_client_uses_base_url() {
        let client = ImportSettings::default().http_client().unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3000/api");

        let settings = ImportSettings {
            base_url: "not a url".into(),
            ..ImportSettings::default()
        };
        assert!(matches!(settings.http_client(), Err(PipelineError::Config(_))));
    }
}
