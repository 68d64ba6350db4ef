/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bare environment variables honoured for compatibility with existing deployments
const ENV_MONGODB_URI: &str = "MONGODB_URI";
const ENV_DATABASE_NAME: &str = "DATABASE_NAME";
const ENV_PORT: &str = "PORT";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_mongodb_uri")]
    pub mongodb_uri: String,

    #[serde(default = "default_database_name")]
    pub database_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongodb,
    /// Process-local collections, lost on restart
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Mongodb => "mongodb",
            StorageBackend::Memory => "memory",
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// Precedence, lowest first: defaults, the config file, `BOTKEEPER_*`
    /// variables, then `MONGODB_URI` / `DATABASE_NAME` / `PORT`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found at {:?}",
                config_path
            )));
        }

        // Override with environment variables (e.g. BOTKEEPER_SERVER__PORT)
        settings = settings.add_source(
            config::Environment::with_prefix("BOTKEEPER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings = settings
            .set_override_option("storage.mongodb_uri", std::env::var(ENV_MONGODB_URI).ok())?
            .set_override_option(
                "storage.database_name",
                std::env::var(ENV_DATABASE_NAME).ok(),
            )?
            .set_override_option("server.port", std::env::var(ENV_PORT).ok())?;

        let config = settings.build()?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_name.trim().is_empty() {
            return Err(ServerError::Config(
                "Database name is required (set DATABASE_NAME)".to_string(),
            ));
        }

        if self.storage.backend == StorageBackend::Mongodb
            && self.storage.mongodb_uri.trim().is_empty()
        {
            return Err(ServerError::Config(
                "MongoDB connection string is required (set MONGODB_URI)".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        backend: StorageBackend::default(),
        mongodb_uri: default_mongodb_uri(),
        database_name: default_database_name(),
    }
}

fn default_mongodb_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database_name() -> String {
    "botkeeper".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
        }
    }
}
