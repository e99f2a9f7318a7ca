//! Server configuration
//!
//! Command line flags with environment variable fallbacks, using clap.

use clap::Parser;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ROOM_NAMES: [&str; 4] = ["room1", "room2", "room3", "room4"];
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid arguments or environment: {0}")]
    Cli(#[from] clap::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("No room names configured")]
    NoRooms,

    #[error("Duplicate room name: {0}")]
    DuplicateRoom(String),
}

/// drawduel - relay server pairing two players per room
#[derive(Parser, Debug, Clone)]
#[command(name = "drawduel")]
#[command(about = "Relay server for two-player drawing and guessing rooms")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value_t = DEFAULT_HOST.to_string())]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Fixed set of rooms, in the order they are reported to clients
    #[arg(
        long,
        env = "ROOM_NAMES",
        value_delimiter = ',',
        default_values_t = DEFAULT_ROOM_NAMES.map(String::from)
    )]
    pub room_names: Vec<String>,

    /// Directory with the browser client, served as the fallback route
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Events each room can queue before senders wait for its worker
    #[arg(long, env = "EVENT_CHANNEL_CAPACITY", default_value_t = DEFAULT_EVENT_CHANNEL_CAPACITY)]
    pub event_channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            room_names: DEFAULT_ROOM_NAMES.iter().map(|s| s.to_string()).collect(),
            static_dir: None,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Parses the process arguments and environment. `--help` and malformed
    /// flags are reported by clap, which exits the process.
    pub fn load() -> Result<Self, ConfigError> {
        Self::parse().validate()
    }

    /// Parses an explicit argument list; flags win over environment values
    pub fn load_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)?.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "EVENT_CHANNEL_CAPACITY",
                value: self.event_channel_capacity.to_string(),
            });
        }

        let names: Vec<String> = self
            .room_names
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        self.with_room_names(names)
    }

    /// Replaces the room set, rejecting empty and duplicate lists
    pub fn with_room_names<I, S>(mut self, names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ConfigError::NoRooms);
        }

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateRoom(name.clone()));
            }
        }

        self.room_names = names;
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
