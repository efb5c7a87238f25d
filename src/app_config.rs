use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Reading API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Article request choices
    #[serde(default)]
    pub reading: ReadingConfig,

    /// Display and layout settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Reading API connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Choices offered when requesting an article
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReadingConfig {
    /// Topic categories the generator understands
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Category used when none is given
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Offered article lengths in words
    #[serde(default = "default_word_counts")]
    pub word_counts: Vec<u32>,

    /// Length used when none is given
    #[serde(default = "default_word_count")]
    pub default_word_count: u32,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            default_category: default_category(),
            word_counts: default_word_counts(),
            default_word_count: default_word_count(),
        }
    }
}

/// Display settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Margin reserved for a visible side panel
    #[serde(default = "default_panel_width")]
    pub panel_width: u32,

    /// Margin left when a side panel is hidden
    #[serde(default = "default_collapsed_margin")]
    pub collapsed_margin: u32,

    /// Marker inserted before each highlighted occurrence
    #[serde(default = "default_highlight_open")]
    pub highlight_open: String,

    /// Marker inserted after each highlighted occurrence
    #[serde(default = "default_highlight_close")]
    pub highlight_close: String,

    /// Title used when the generator does not return one
    #[serde(default = "default_article_title")]
    pub default_article_title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            panel_width: default_panel_width(),
            collapsed_margin: default_collapsed_margin(),
            highlight_open: default_highlight_open(),
            highlight_close: default_highlight_close(),
            default_article_title: default_article_title(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    120 // generation plus translation on the server side is slow
}

fn default_categories() -> Vec<String> {
    ["technology", "politics", "business", "science"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_category() -> String {
    "technology".to_string()
}

fn default_word_counts() -> Vec<u32> {
    vec![200, 300, 500]
}

fn default_word_count() -> u32 {
    300
}

fn default_panel_width() -> u32 {
    320
}

fn default_collapsed_margin() -> u32 {
    20
}

fn default_highlight_open() -> String {
    "<mark>".to_string()
}

fn default_highlight_close() -> String {
    "</mark>".to_string()
}

fn default_article_title() -> String {
    "Generated Article".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot be used as a base: {}", self.api.base_url));
        }

        if self.api.timeout_secs == 0 {
            return Err(anyhow!("API timeout must be at least one second"));
        }

        if self.reading.categories.is_empty() {
            return Err(anyhow!("At least one category must be configured"));
        }

        if !self.reading.categories.contains(&self.reading.default_category) {
            return Err(anyhow!(
                "Default category '{}' is not one of the configured categories",
                self.reading.default_category
            ));
        }

        if self.reading.word_counts.contains(&0) || self.reading.default_word_count == 0 {
            return Err(anyhow!("Word counts must be positive"));
        }

        if self.display.panel_width < self.display.collapsed_margin {
            return Err(anyhow!(
                "Panel width ({}) must not be smaller than the collapsed margin ({})",
                self.display.panel_width,
                self.display.collapsed_margin
            ));
        }

        if self.display.highlight_open.is_empty() || self.display.highlight_close.is_empty() {
            return Err(anyhow!("Highlight markers must not be empty"));
        }

        Ok(())
    }

    /// Load the configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Load the configuration, writing a default file first if none exists
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Whether a category is one of the configured ones
    pub fn is_known_category(&self, category: &str) -> bool {
        self.reading.categories.iter().any(|c| c == category)
    }
}
