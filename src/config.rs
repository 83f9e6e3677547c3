use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

static CONFIG: OnceCell<ServerConfig> = OnceCell::new();

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,

    /// One network read of this size must hold a whole request.
    pub buffer_size: usize,

    #[serde(deserialize_with = "deserialize_duration")]
    pub read_timeout: Duration,

    /// Base directory for the file-serving routes.
    pub files_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 4221,
            buffer_size: 4096,
            read_timeout: Duration::from_secs(5),
            files_root: std::env::temp_dir(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &str) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("failed to read {path}: {err}, falling back to defaults");
                return ServerConfig::default();
            }
        };

        match toml::from_str::<ServerConfig>(content.as_str()) {
            Ok(server_config) => server_config,
            Err(err) => {
                log::warn!("failed to deserialize {path}: {err}, falling back to defaults");
                ServerConfig::default()
            }
        }
    }
}

pub fn set_config(cfg: ServerConfig) {
    CONFIG.set(cfg).expect("config already set");
}

pub fn config() -> &'static ServerConfig {
    CONFIG.get().expect("config not initialized")
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Ok(Duration::from_secs_f64(secs))
}
