use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::trace::event::Category;

/// Top-level configuration for the report generator.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Logging verbosity (trace, debug, info, warn, error). Default: "warn".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// When to style headers with ANSI escapes. Default: auto.
    #[serde(default)]
    pub color: ColorMode,

    /// Category labels to report, e.g. "mram_read". Default: all six.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Only report these channel ids. Empty reports every channel.
    #[serde(default)]
    pub channels: Vec<String>,
}

/// Header styling policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Style only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve against whether the output is a terminal and whether
    /// `NO_COLOR` is set. Only `auto` defers to `NO_COLOR`.
    pub fn enabled(self, is_terminal: bool, no_color: bool) -> bool {
        match self {
            Self::Auto => is_terminal && !no_color,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub color: Option<ColorMode>,
    pub categories: Vec<String>,
    pub channels: Vec<String>,
}

// --- Default value functions ---

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_categories() -> Vec<String> {
    Category::all()
        .iter()
        .map(|c| c.as_str().to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            color: ColorMode::default(),
            categories: default_categories(),
            channels: Vec::new(),
        }
    }
}

// --- Validation and loading ---

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;

        let cfg: Config = serde_yaml::from_str(&data)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            bail!("log_level must not be empty");
        }

        if self.categories.is_empty() {
            bail!("categories must name at least one category");
        }

        let mut seen = HashSet::new();
        for name in &self.categories {
            if Category::from_name(name).is_none() {
                bail!("unknown category: {name}");
            }
            if !seen.insert(name.as_str()) {
                bail!("category listed more than once: {name}");
            }
        }

        if self.channels.iter().any(|c| c.is_empty()) {
            bail!("channels must not contain empty names");
        }

        Ok(())
    }

    /// Selected categories in report order, regardless of the order listed.
    pub fn selected_categories(&self) -> Vec<Category> {
        Category::all()
            .iter()
            .copied()
            .filter(|c| self.categories.iter().any(|name| name == c.as_str()))
            .collect()
    }

    /// Apply command-line values over whatever the file set.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(color) = overrides.color {
            self.color = color;
        }
        if !overrides.categories.is_empty() {
            self.categories = overrides.categories;
        }
        if !overrides.channels.is_empty() {
            self.channels = overrides.channels;
        }
    }

    /// Whether events on `channel_id` should be reported.
    pub fn includes_channel(&self, channel_id: &str) -> bool {
        self.channels.is_empty() || self.channels.iter().any(|c| c == channel_id)
    }
}
