use config::{Config, ConfigError, File, FileFormat};

use serde::{Deserialize, Serialize};
use std::io;
use std::net::SocketAddr;

use tracing::info;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HTTPConfig {
    pub host: String,
    pub port: u16,
}

impl HTTPConfig {
    pub fn connection_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolves `host` so names like `localhost` work as well as IP literals.
    pub async fn socket_addr(&self) -> io::Result<SocketAddr> {
        let host_port = self.connection_string();
        let addr = tokio::net::lookup_host(&host_port)
            .await?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no address found for {host_port}"),
                )
            });
        addr
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataConfig {
    /// JSON array of recipes served by `GET /recipes`.
    pub recipes_path: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub http_config: HTTPConfig,
    pub data_config: DataConfig,
}

impl AppConfig {
    pub fn load(path_str: &str) -> Result<Self, ConfigError> {
        let mut conf = Config::default();
        conf.merge(File::new(path_str, FileFormat::Toml))?;
        Self::from_config(&conf, |key| std::env::var(key).ok())
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let mut conf = Config::default();
        conf.merge(File::from_str(toml, FileFormat::Toml))?;
        Self::from_config(&conf, |_| None)
    }

    fn from_config<E>(conf: &Config, env: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut http_config = conf.get::<HTTPConfig>("http")?;
        if let Some(host) = env("RECIPES_SERVER_HOST") {
            info!("getting server host from env: {host}");
            http_config.host = host;
        } else {
            info!("getting server host from file");
        }
        if let Some(port) = env("RECIPES_SERVER_PORT") {
            info!("getting server port from env: {port}");
            http_config.port = port.parse::<u16>().map_err(|_| {
                ConfigError::Message(format!("Failed to parse server port from env: {port}"))
            })?;
        }

        let mut data_config = conf.get::<DataConfig>("data")?;
        if let Some(recipes_path) = env("RECIPES_DATA_PATH") {
            info!("getting recipes path from env");
            data_config.recipes_path = recipes_path;
        }

        Ok(AppConfig {
            http_config,
            data_config,
        })
    }
}
