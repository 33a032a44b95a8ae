use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_MAX_LINES: usize = 4;
pub const DEFAULT_TERMINAL_WIDTH: usize = 79;

/// Immutable display configuration, fixed for the lifetime of the loop.
///
/// `total_steps == 0` disables the progress bar, `max_lines == 0` disables
/// the message window, and `refresh_seconds == 0` disables the idle
/// heartbeat. A zero/zero configuration is legal and yields a title-only
/// display.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusConfig {
    pub title: String,
    #[serde(default)]
    pub total_steps: usize,
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    #[serde(default)]
    pub refresh_seconds: f64,
    #[serde(default = "default_terminal_width")]
    pub terminal_width: usize,
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

fn default_terminal_width() -> usize {
    DEFAULT_TERMINAL_WIDTH
}

impl StatusConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            total_steps: 0,
            max_lines: DEFAULT_MAX_LINES,
            refresh_seconds: 0.0,
            terminal_width: DEFAULT_TERMINAL_WIDTH,
        }
    }

    pub fn with_total_steps(mut self, total_steps: usize) -> Self {
        self.total_steps = total_steps;
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_refresh_seconds(mut self, refresh_seconds: f64) -> Self {
        self.refresh_seconds = refresh_seconds;
        self
    }

    pub fn with_terminal_width(mut self, terminal_width: usize) -> Self {
        self.terminal_width = terminal_width;
        self
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    /// Load a configuration from a TOML file on disk.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml(&text)
    }
}

/// Current terminal width in columns, falling back to the fixed default
/// when the output is not a terminal.
pub fn detect_terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(columns, _rows)| columns as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH)
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        error: std::io::Error,
    },
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, error } => {
                write!(f, "failed to read config `{}`: {error}", path.display())
            }
            ConfigError::Parse(error) => write!(f, "failed to parse config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}
