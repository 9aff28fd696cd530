//! Command-line surface of the `wikivox` binary.
//!
//! Flags beat environment variables, which beat the config file. Only the
//! settings worth flipping per invocation get a flag; everything else lives
//! in the TOML config.

use std::path::PathBuf;

use clap::Parser;

use wikivox_core::types::Language;

/// Overrides the config file path.
pub const CONFIG_ENV: &str = "WIKIVOX_CONFIG";
/// Overrides the API server port.
pub const PORT_ENV: &str = "WIKIVOX_PORT";

/// WikiVox — an encyclopedia chat assistant with voice input and spoken replies.
#[derive(Parser, Debug)]
#[command(name = "wikivox", version, about)]
pub struct CliArgs {
    /// Configuration file (default: ~/.wikivox/config.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Default lookup language (en, hi, fr, es, de).
    #[arg(short = 'L', long = "language")]
    pub language: Option<Language>,

    /// Fetch full article bodies instead of short summaries by default.
    #[arg(long = "full-article")]
    pub full_article: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Config file to load. Falls back to the working directory when no home
    /// directory is known.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| match home_dir() {
                Some(home) => home.join(".wikivox").join("config.toml"),
                None => PathBuf::from("config.toml"),
            })
    }

    /// Port to bind. A non-numeric `WIKIVOX_PORT` is ignored rather than
    /// aborting startup.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        self.port
            .or_else(|| std::env::var(PORT_ENV).ok()?.parse().ok())
            .unwrap_or(config_port)
    }

    /// Log filter directive handed to the subscriber.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";
    std::env::var(var).ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["wikivox"]);
        assert!(args.config.is_none());
        assert!(args.port.is_none());
        assert!(args.language.is_none());
        assert!(!args.full_article);
    }

    #[test]
    fn test_explicit_flags() {
        let args = CliArgs::parse_from([
            "wikivox",
            "--port",
            "8080",
            "--language",
            "fr",
            "--full-article",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.language, Some(Language::Fr));
        assert!(args.full_article);
        assert_eq!(args.resolve_log_level("info"), "debug");
    }

    #[test]
    fn test_port_flag_wins_over_config() {
        let args = CliArgs::parse_from(["wikivox", "-p", "9000"]);
        assert_eq!(args.resolve_port(3030), 9000);
    }

    #[test]
    fn test_config_port_used_without_flag() {
        let args = CliArgs::parse_from(["wikivox"]);
        std::env::remove_var(PORT_ENV);
        assert_eq!(args.resolve_port(3030), 3030);
    }

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs::parse_from(["wikivox", "-c", "/tmp/custom.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/custom.toml"));
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let args = CliArgs::parse_from(["wikivox"]);
        assert_eq!(args.resolve_log_level("warn"), "warn");
    }
}
