//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{
    balancing, cgmes, config_files, datasets, export_api, output_formats, timeouts,
};
use crate::core::error::{GridProbeError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timeout in seconds for HTTP requests
    pub timeout: Option<u64>,

    /// Retry attempts for failed requests
    pub retry_attempts: Option<u8>,

    /// Delay between retries in milliseconds
    pub retry_delay: Option<u64>,

    /// Custom User-Agent header
    pub user_agent: Option<String>,

    /// HTTP/HTTPS proxy URL
    pub proxy: Option<String>,

    /// Export endpoint of the transparency dashboard
    pub api_url: Option<String>,

    /// Output time zone requested from the API
    pub timezone: Option<String>,

    /// aFRR activation dataset id
    pub afrr_dataset: Option<String>,

    /// Imbalance volume dataset id
    pub imbalance_dataset: Option<String>,

    /// Balancing state dataset id
    pub balancing_state_dataset: Option<String>,

    /// Resample period in minutes
    pub resample_minutes: Option<u32>,

    /// Rows of the balancing state shown in the preview
    pub preview_rows: Option<usize>,

    /// Directory the chart is written to
    pub output_dir: Option<String>,

    /// Render the chart
    pub plot: Option<bool>,

    /// rdf:ID of the transformer to inspect
    pub transformer_id: Option<String>,

    /// Display label of the transformer to inspect
    pub transformer_label: Option<String>,

    /// Name of the line whose limits are reported
    pub line_name: Option<String>,

    /// Winding definitions expected per transformer
    pub expected_windings: Option<usize>,

    /// rdf:IDs that flag a broken OperationalLimitType
    pub suspect_ids: Option<Vec<String>>,

    /// Output format (text, json)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Some(timeouts::DEFAULT_TIMEOUT_SECONDS),
            retry_attempts: Some(0),
            retry_delay: Some(timeouts::DEFAULT_RETRY_DELAY_MS),
            user_agent: None,
            proxy: None,
            api_url: Some(export_api::BASE_URL.to_string()),
            timezone: Some(export_api::DEFAULT_TIMEZONE.to_string()),
            afrr_dataset: Some(datasets::AFRR_ACTIVATIONS.to_string()),
            imbalance_dataset: Some(datasets::IMBALANCE_VOLUMES.to_string()),
            balancing_state_dataset: Some(datasets::BALANCING_STATE.to_string()),
            resample_minutes: Some(balancing::DEFAULT_RESAMPLE_MINUTES),
            preview_rows: Some(balancing::DEFAULT_PREVIEW_ROWS),
            output_dir: Some(balancing::DEFAULT_OUTPUT_DIR.to_string()),
            plot: Some(true),
            transformer_id: Some(cgmes::DEFAULT_TRANSFORMER_ID.to_string()),
            transformer_label: Some(cgmes::DEFAULT_TRANSFORMER_LABEL.to_string()),
            line_name: Some(cgmes::DEFAULT_LINE_NAME.to_string()),
            expected_windings: Some(cgmes::EXPECTED_WINDINGS),
            suspect_ids: Some(
                cgmes::SUSPECT_LIMIT_TYPE_IDS
                    .iter()
                    .map(|id| id.to_string())
                    .collect(),
            ),
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
        }
    }
}

impl Config {
    /// Load configuration from file. Fields missing from the file keep their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GridProbeError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let parsed: Config = toml::from_str(&content)?;

        let mut config = Self::default();
        config.overlay(parsed);
        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        for path in Self::standard_locations() {
            if path.is_file() {
                match Self::load_from_file(&path) {
                    Ok(config) => {
                        log::debug!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring {}: {e}", path.display()),
                }
            }
        }

        Self::default()
    }

    fn standard_locations() -> Vec<PathBuf> {
        (0..=config_files::PARENT_SEARCH_DEPTH)
            .map(|depth| {
                PathBuf::from(format!(
                    "{}{}",
                    "../".repeat(depth),
                    config_files::FILE_NAME
                ))
            })
            .collect()
    }

    /// Copy every field that is set in `other` onto `self`
    fn overlay(&mut self, other: Config) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }

        take!(
            timeout,
            retry_attempts,
            retry_delay,
            user_agent,
            proxy,
            api_url,
            timezone,
            afrr_dataset,
            imbalance_dataset,
            balancing_state_dataset,
            resample_minutes,
            preview_rows,
            output_dir,
            plot,
            transformer_id,
            transformer_label,
            line_name,
            expected_windings,
            suspect_ids,
            output_format,
            verbose,
        );
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Network
        if let Some(timeout) = cli_config.timeout {
            self.timeout = Some(timeout);
        }
        if let Some(retry_attempts) = cli_config.retry_attempts {
            self.retry_attempts = Some(retry_attempts);
        }
        if let Some(retry_delay) = cli_config.retry_delay {
            self.retry_delay = Some(retry_delay);
        }
        if let Some(ref user_agent) = cli_config.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        if let Some(ref proxy) = cli_config.proxy {
            self.proxy = Some(proxy.clone());
        }
        if let Some(ref api_url) = cli_config.api_url {
            self.api_url = Some(api_url.clone());
        }

        // Balancing
        if let Some(ref timezone) = cli_config.timezone {
            self.timezone = Some(timezone.clone());
        }
        if let Some(preview_rows) = cli_config.preview_rows {
            self.preview_rows = Some(preview_rows);
        }
        if let Some(ref output_dir) = cli_config.output_dir {
            self.output_dir = Some(output_dir.clone());
        }
        if cli_config.no_plot {
            self.plot = Some(false);
        }

        // CGMES
        if let Some(ref transformer_id) = cli_config.transformer_id {
            self.transformer_id = Some(transformer_id.clone());
        }
        if let Some(ref transformer_label) = cli_config.transformer_label {
            self.transformer_label = Some(transformer_label.clone());
        }
        if let Some(ref line_name) = cli_config.line_name {
            self.line_name = Some(line_name.clone());
        }

        // Output & format
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(timeouts::DEFAULT_TIMEOUT_SECONDS))
    }

    /// Get retry delay as Duration
    pub fn retry_delay_duration(&self) -> Duration {
        Duration::from_millis(self.retry_delay.unwrap_or(timeouts::DEFAULT_RETRY_DELAY_MS))
    }

    /// Resample period in minutes
    pub fn resample_minutes(&self) -> u32 {
        self.resample_minutes
            .unwrap_or(balancing::DEFAULT_RESAMPLE_MINUTES)
    }

    /// Verbose logging from the config file or `--verbose`
    pub fn is_verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }

    /// True when reports should be emitted as JSON
    pub fn is_json(&self) -> bool {
        self.output_format.as_deref() == Some(output_formats::JSON)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err(GridProbeError::Config(
                    "Timeout cannot be 0. Expected a positive integer representing seconds."
                        .to_string(),
                ));
            }
            if timeout > timeouts::MAX_TIMEOUT_SECONDS {
                return Err(GridProbeError::Config(format!(
                    "Timeout of {timeout} seconds is too large. Expected at most {}.",
                    timeouts::MAX_TIMEOUT_SECONDS
                )));
            }
        }

        if let Some(retry) = self.retry_attempts
            && retry > timeouts::MAX_RETRY_ATTEMPTS
        {
            return Err(GridProbeError::Config(format!(
                "Retry attempts of {retry} is too high. Expected at most {}.",
                timeouts::MAX_RETRY_ATTEMPTS
            )));
        }

        if let Some(minutes) = self.resample_minutes
            && (minutes == 0 || balancing::MINUTES_PER_DAY % minutes != 0)
        {
            return Err(GridProbeError::Config(format!(
                "Resample period of {minutes} minutes must be positive and divide a day evenly."
            )));
        }

        if let Some(0) = self.preview_rows {
            return Err(GridProbeError::Config(
                "Preview rows cannot be 0.".to_string(),
            ));
        }

        if let Some(ref url) = self.api_url
            && !url.starts_with("http")
        {
            return Err(GridProbeError::Config(format!(
                "API URL '{url}' must start with http:// or https://."
            )));
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(GridProbeError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Network
    pub timeout: Option<u64>,         // --timeout
    pub retry_attempts: Option<u8>,   // --retry
    pub retry_delay: Option<u64>,     // --retry-delay
    pub user_agent: Option<String>,   // --user-agent
    pub proxy: Option<String>,        // --proxy
    pub api_url: Option<String>,      // --api-url

    // Balancing
    pub timezone: Option<String>,     // --timezone
    pub preview_rows: Option<usize>,  // --preview-rows
    pub output_dir: Option<String>,   // --output-dir
    pub no_plot: bool,                // --no-plot

    // CGMES
    pub transformer_id: Option<String>,    // --transformer-id
    pub transformer_label: Option<String>, // --transformer-label
    pub line_name: Option<String>,         // --line-name

    // Output & format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}
