use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the file logs are appended to.
pub const LOG_FILE_ENV: &str = "KILO_LOG";

const DEFAULT_QUIT_TIMES: u32 = 3;
const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Config {
    /// Extra Ctrl-Q presses needed to quit with unsaved changes.
    pub quit_times: u32,
    /// How long a status message stays on screen.
    pub message_timeout: Duration,
    pub version: String,
    pub help_message: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quit_times: DEFAULT_QUIT_TIMES,
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            version: env!("CARGO_PKG_VERSION").to_string(),
            help_message: String::from("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find"),
            log_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_log_file(std::env::var_os(LOG_FILE_ENV).map(PathBuf::from))
    }

    pub fn with_log_file(mut self, log_file: Option<PathBuf>) -> Self {
        self.log_file = log_file.filter(|p| !p.as_os_str().is_empty());
        self
    }

    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        if self.message_timeout.is_zero() {
            log::warn!("Message timeout is zero, using default");
            self.message_timeout = DEFAULT_MESSAGE_TIMEOUT;
            has_issues = true;
        }

        if self.version.is_empty() {
            log::warn!("Empty version string, using package version");
            self.version = env!("CARGO_PKG_VERSION").to_string();
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.quit_times, 3);
        assert_eq!(config.message_timeout, Duration::from_secs(5));
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
        assert!(config.help_message.contains("Ctrl-Q = quit"));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_validate_fixes_invalid_values() {
        let mut config = Config {
            message_timeout: Duration::ZERO,
            version: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.message_timeout, Duration::from_secs(5));
        assert!(!config.version.is_empty());
    }

    #[test]
    fn test_empty_log_file_is_ignored() {
        let config = Config::default().with_log_file(Some(PathBuf::new()));
        assert!(config.log_file.is_none());

        let config = Config::default().with_log_file(Some(PathBuf::from("kilo.log")));
        assert_eq!(config.log_file, Some(PathBuf::from("kilo.log")));
    }
}
