//! MudProg Configuration Management
//!
//! Loads the prog runtime options from `progoptions.txt`, a `key = value`
//! file that lives next to the rest of the server configuration.

use mudprog_core::Result;
use std::fs;
use std::path::Path;

/// Default location of the options file, relative to the working directory
pub const DEFAULT_OPTIONS_PATH: &str = "servers/default/config/progoptions.txt";

/// Output format of the generated prog documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpFormat {
    Text,
    Json,
}

/// Prog runtime configuration
#[derive(Debug, Clone)]
pub struct ProgConfig {
    /// Maximum expression nesting evaluated before a prog is aborted (from "maxdepth")
    pub max_evaluation_depth: usize,
    /// `tracing` env-filter directives (from "logfilter")
    pub log_filter: String,
    /// Column width used when wrapping help text (from "helpwidth")
    pub help_width: usize,
    /// Help output format (from "helpformat")
    pub help_format: HelpFormat,
}

impl Default for ProgConfig {
    fn default() -> Self {
        Self {
            max_evaluation_depth: 256,
            log_filter: "info".into(),
            help_width: 80,
            help_format: HelpFormat::Text,
        }
    }
}

impl ProgConfig {
    /// Load configuration from an options file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Load configuration from the default server path
    pub fn load_default() -> Result<Self> {
        Self::load_from_file(DEFAULT_OPTIONS_PATH)
    }

    /// Parse progoptions.txt content
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();

                config.parse_option(key, value);
            }
        }

        config
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key.to_lowercase().as_str() {
            "maxdepth" => match value.parse::<usize>() {
                Ok(depth) if depth > 0 => self.max_evaluation_depth = depth,
                _ => tracing::warn!("Ignoring invalid maxdepth '{}'", value),
            },
            "logfilter" => self.log_filter = value.into(),
            "helpwidth" => {
                self.help_width = value.parse().unwrap_or(80).max(20);
            }
            "helpformat" => {
                self.help_format = match value.to_lowercase().as_str() {
                    "json" => HelpFormat::Json,
                    "text" => HelpFormat::Text,
                    _ => {
                        tracing::warn!("Unknown helpformat '{}', using text", value);
                        HelpFormat::Text
                    }
                };
            }
            _ => {
                tracing::debug!("Unknown prog option: {} = {}", key, value);
            }
        }
    }

    /// Log a configuration summary
    pub fn display(&self) {
        tracing::info!("Prog configuration:");
        tracing::info!("  Max evaluation depth: {}", self.max_evaluation_depth);
        tracing::info!("  Log filter: {}", self.log_filter);
        tracing::info!("  Help: {:?}, {} columns", self.help_format, self.help_width);
    }
}
