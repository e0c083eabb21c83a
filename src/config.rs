//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::storage::SETTINGS_FILE_NAME;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-server")]
#[command(about = "A state-managed HTTP server running a focus/break interval timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20525")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Where timer settings are persisted
    #[arg(long, value_name = "PATH")]
    pub settings_file: Option<PathBuf>,

    /// Show a desktop notification when an interval completes
    #[arg(short, long)]
    pub notify: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Settings file to use, falling back to the user config directory
    pub fn settings_path(&self) -> PathBuf {
        self.settings_file.clone().unwrap_or_else(default_settings_path)
    }
}

/// `<config dir>/pomodoro/<file>`, or the bare file name when the platform
/// has no config directory
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("pomodoro").join(SETTINGS_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["pomodoro-server"]).unwrap();
        assert_eq!(config.port, 20525);
        assert_eq!(config.address(), "127.0.0.1:20525");
        assert_eq!(config.log_level(), "info");
        assert!(!config.notify);
        assert!(config.settings_path().ends_with(SETTINGS_FILE_NAME));
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "pomodoro-server",
            "-p",
            "8080",
            "--host",
            "0.0.0.0",
            "--settings-file",
            "/tmp/pomodoro.json",
            "--notify",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.log_level(), "debug");
        assert!(config.notify);
        assert_eq!(config.settings_path(), PathBuf::from("/tmp/pomodoro.json"));
    }
}
