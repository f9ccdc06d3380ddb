use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const CONFIG_PATHS: [&str; 2] = ["/etc/omniflows/web.toml", "./web.toml"];
const DEFAULT_LISTEN_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: IpAddr,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

fn default_listen_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            listen_port: default_listen_port(),
        }
    }
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        for path in CONFIG_PATHS {
            if let Ok(contents) = fs::read_to_string(path) {
                tracing::info!("Loading server config from {}", path);
                return Self::from_toml(&contents);
            }
        }

        tracing::info!("Loading server config from environment");
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            listen_addr: lookup("LISTEN_ADDR")
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or_else(default_listen_addr),
            listen_port: lookup("LISTEN_PORT")
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(DEFAULT_LISTEN_PORT),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.listen_port)
    }
}
