//! Load configuration via `config` crate with env-override support.

use std::{collections::HashMap, ops::Deref, path::PathBuf, sync::Arc};

use serde::Deserialize;
use serde_with::{PickFirst, StringWithSeparator, formats::CommaSeparator, serde_as};

use crate::base::prompts;

use super::types::{Credentials, Res, Secret};

/// Default Anthropic model to use.
fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

/// Default max output tokens for the Anthropic model.
fn default_anthropic_max_tokens() -> u32 {
    1024
}

/// Default Anthropic API base URL.
fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com/v1/".to_string()
}

/// Default `anthropic-version` header value.
fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

/// Default timeout for a single Anthropic call, in seconds.
fn default_anthropic_timeout_secs() -> u64 {
    120
}

/// Default analysis prompt template.
fn default_analysis_prompt() -> String {
    prompts::ISSUE_ANALYSIS_PROMPT.to_string()
}

/// Configuration for the issue analyzer.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// GitHub API token (`GITHUB_TOKEN`).
    #[serde(default)]
    pub github_token: Option<Secret>,
    /// Anthropic API key (`ANTHROPIC_API_KEY`).
    #[serde(default)]
    pub anthropic_api_key: Option<Secret>,
    /// Path to the event payload written by the platform (`GITHUB_EVENT_PATH`).
    #[serde(default)]
    pub github_event_path: Option<PathBuf>,
    /// Repository the workflow runs in, as `owner/repo` (`GITHUB_REPOSITORY`).
    #[serde(default)]
    pub github_repository: Option<String>,
    /// GitHub API URL, set by the platform on GitHub Enterprise (`GITHUB_API_URL`).
    #[serde(default)]
    pub github_api_url: Option<String>,
    /// Anthropic model to use (`ANTHROPIC_MODEL`).
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    /// Max output tokens for the Anthropic model (`ANTHROPIC_MAX_TOKENS`).
    #[serde(default = "default_anthropic_max_tokens")]
    pub anthropic_max_tokens: u32,
    /// Anthropic API base URL (`ANTHROPIC_BASE_URL`).
    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_base_url: String,
    /// Anthropic API version header (`ANTHROPIC_VERSION`).
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,
    /// Timeout for a single Anthropic call, in seconds (`ANTHROPIC_TIMEOUT_SECS`).
    #[serde(default = "default_anthropic_timeout_secs")]
    pub anthropic_timeout_secs: u64,
    /// Optional custom analysis prompt to override the default (`ANALYSIS_PROMPT`).
    #[serde(default = "default_analysis_prompt")]
    pub analysis_prompt: String,
    /// Only analyze issues carrying at least one of these labels (`LABEL_FILTER`, comma-separated).
    ///
    /// Empty disables the filter.
    #[serde_as(as = "PickFirst<(_, StringWithSeparator<CommaSeparator, String>)>")]
    #[serde(default)]
    pub label_filter: Vec<String>,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            github_token: None,
            anthropic_api_key: None,
            github_event_path: None,
            github_repository: None,
            github_api_url: None,
            anthropic_model: default_anthropic_model(),
            anthropic_max_tokens: default_anthropic_max_tokens(),
            anthropic_base_url: default_anthropic_base_url(),
            anthropic_version: default_anthropic_version(),
            anthropic_timeout_secs: default_anthropic_timeout_secs(),
            analysis_prompt: default_analysis_prompt(),
            label_filter: Vec::new(),
        }
    }
}

impl Config {
    /// Load the configuration from the process environment and an optional TOML file.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        Self::load_with_env(None, explicit_path)
    }

    /// Load the configuration, reading environment variables from `env` instead of the process
    /// environment when provided.
    pub fn load_with_env(env: Option<HashMap<String, String>>, explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let environment = config::Environment::default().source(env);

        // Files first, so that the environment wins.
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        cfg = cfg.add_source(environment);

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check the value ranges of the tunables.
    pub fn validate(&self) -> Res<()> {
        // The upper bound depends on the model, so the API enforces it.
        if self.anthropic_max_tokens < 1 {
            return Err(anyhow::anyhow!("Anthropic max tokens must be at least 1."));
        }

        if self.anthropic_timeout_secs < 1 {
            return Err(anyhow::anyhow!("Anthropic timeout must be at least 1 second."));
        }

        if self.analysis_prompt.trim().is_empty() {
            return Err(anyhow::anyhow!("Analysis prompt must not be empty."));
        }

        Ok(())
    }

    /// Get both credentials, failing with every missing variable named.
    pub fn credentials(&self) -> Res<Credentials> {
        let github_token = self.github_token.as_ref().filter(|s| !s.is_blank());
        let anthropic_api_key = self.anthropic_api_key.as_ref().filter(|s| !s.is_blank());

        match (github_token, anthropic_api_key) {
            (Some(github_token), Some(anthropic_api_key)) => Ok(Credentials {
                github_token: github_token.clone(),
                anthropic_api_key: anthropic_api_key.clone(),
            }),
            (github_token, anthropic_api_key) => {
                let missing = [("GITHUB_TOKEN", github_token.is_none()), ("ANTHROPIC_API_KEY", anthropic_api_key.is_none())]
                    .into_iter()
                    .filter_map(|(name, missing)| missing.then_some(name))
                    .collect::<Vec<_>>();

                Err(anyhow::anyhow!("Missing required credentials: {}.", missing.join(", ")))
            }
        }
    }

    /// Whether the label filter lets an issue with these labels through.
    pub fn labels_pass_filter<'a>(&self, mut labels: impl Iterator<Item = &'a String>) -> bool {
        let filter = self.label_filter.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect::<Vec<_>>();

        filter.is_empty() || labels.any(|label| filter.contains(&label.as_str()))
    }
}

// Tests.
