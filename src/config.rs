//! Process configuration from environment variables and command line.
//!
//! | Env                  | Flag     | Default   |
//! |----------------------|----------|-----------|
//! | `PORT`               | `--port` | `3000`    |
//! | `HOTEL_BIND`         | `--bind` | `0.0.0.0` |
//! | `HOTEL_DB_PATH`      | `--db`   | `db.json` |
//! | `HOTEL_SAVE_RETRIES` |          | `0`       |
//!
//! Flags win over environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_DB_PATH: &str = "db.json";

pub const USAGE: &str = "usage: hotel_api [--port PORT] [--bind HOST] [--db PATH]";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub bind: String,
    pub db_path: PathBuf,
    pub save_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            save_retries: 0,
        }
    }
}

impl Config {
    /// Read the process environment and arguments (skipping the program name).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(|key| std::env::var(key).ok(), std::env::args().skip(1))
    }

    /// Build a config from an env lookup and an argument list.
    pub fn from_sources<I>(env: impl Fn(&str) -> Option<String>, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();

        if let Some(port) = env("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(bind) = env("HOTEL_BIND") {
            config.bind = bind;
        }
        if let Some(path) = env("HOTEL_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(retries) = env("HOTEL_SAVE_RETRIES") {
            config.save_retries = parse("HOTEL_SAVE_RETRIES", &retries)?;
        }

        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            if !matches!(flag.as_str(), "--port" | "--bind" | "--db") {
                return Err(ConfigError::UnknownArgument(flag));
            }
            let value = args
                .next()
                .ok_or_else(|| ConfigError::MissingValue(flag.clone()))?;
            match flag.as_str() {
                "--port" => config.port = parse("--port", &value)?,
                "--bind" => config.bind = value,
                _ => config.db_path = PathBuf::from(value),
            }
        }

        Ok(config)
    }

    /// Socket address to listen on.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
