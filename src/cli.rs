use crate::config::{Config, ConfigError};
use crate::logging::Verbosity;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "brain_cards", version, about = "Flashcard category server")]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, env = "BRAIN_CARDS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "BRAIN_CARDS_HOST")]
    pub host: Option<String>,

    /// Path of the category database file
    #[arg(long, env = "BRAIN_CARDS_DB")]
    pub db: Option<String>,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            return Verbosity::Quiet;
        }
        match self.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Trace,
        }
    }

    /// Defaults, then the config file, then flags and environment.
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(ref host) = self.host {
            config.host = host.clone();
        }
        if let Some(ref db) = self.db {
            config.storage_path = db.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
