/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed wizard configuration and the client/polling/export settings derived from it
[POS]:    Configuration layer - service endpoint, polling cadence, export target
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use drawtest_adapter::ClientConfig;
use drawtest_adapter::http::client::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

use crate::polling::PollStatusSource;
use crate::questionnaire::Questionnaire;

/// Top-level configuration for the wizard
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WizardConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub export: ExportConfig,
    /// Questionnaire YAML replacing the built-in one
    #[serde(default)]
    pub questionnaire_path: Option<PathBuf>,
}

/// Remote drawing-test service
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Report status polling on the results screen
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub status_source: PollStatusSource,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            status_source: PollStatusSource::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Where summaries and downloaded reports land
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_interval_secs() -> u64 {
    5
}

impl WizardConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = parse_base_url(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api.base_url must be http or https: {url}");
        }
        if self.api.timeout_secs == 0 || self.api.connect_timeout_secs == 0 {
            bail!("api timeouts must be positive");
        }
        if self.polling.interval_secs == 0 {
            bail!("polling.interval_secs must be positive");
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.api.timeout_secs),
            connect_timeout: Duration::from_secs(self.api.connect_timeout_secs),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    /// Configured directory, else the user's download directory, else the working directory
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn load_questionnaire(&self) -> anyhow::Result<Questionnaire> {
        match self.questionnaire_path.as_deref() {
            Some(path) => Questionnaire::from_file(path)
                .with_context(|| format!("load questionnaire from {}", path.display())),
            None => Questionnaire::builtin().context("load built-in questionnaire"),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = base_url.to_string();
        self
    }

    /// Resolve a relative questionnaire path against the config file's directory
    pub fn resolve_paths(mut self, config_path: &Path) -> Self {
        if let (Some(path), Some(dir)) = (self.questionnaire_path.as_ref(), config_path.parent()) {
            if path.is_relative() {
                self.questionnaire_path = Some(dir.join(path));
            }
        }
        self
    }
}

fn parse_base_url(raw: &str) -> anyhow::Result<url::Url> {
    url::Url::parse(raw).with_context(|| format!("invalid api.base_url: {raw}"))
}
