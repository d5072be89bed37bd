//! Command-line arguments
//!
//! Flags override the layered configuration file and environment.

use clap::Parser;
use lunchbot_core::config::AppConfig;
use std::path::PathBuf;

/// Lunch menu recommendation chatbot server
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "lunchbot", version, about)]
pub struct Args {
    /// Path to a TOML config file (default: ./lunchbot.toml if present)
    #[arg(short, long, env = "LUNCHBOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Menu table file (.xlsx or .csv)
    #[arg(short = 'm', long = "menu-file")]
    pub menu_file: Option<PathBuf>,
}

impl Args {
    /// Apply flag overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref menu_file) = self.menu_file {
            config.menu.path = menu_file.clone();
        }
    }
}

/// Parse arguments from an iterator (first item is the program name)
pub fn parse_args<I, T>(args: I) -> crate::cli::Result<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args).map_err(|e| crate::cli::Error::InvalidArgs(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keeps_config() {
        let args = parse_args(["lunchbot"]).unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse_args([
            "lunchbot",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--menu-file",
            "menus.csv",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.menu.path, PathBuf::from("menus.csv"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = parse_args(["lunchbot", "--port", "notaport"]);
        assert!(matches!(result, Err(crate::cli::Error::InvalidArgs(_))));
    }
}
