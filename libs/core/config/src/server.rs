use crate::{env_or_default, ConfigError, FromEnv};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Listen address of the users API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables, falling back to [`ServerConfig::default`]:
    /// - HOST: an IP literal, defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let host = parse_var("HOST", &defaults.host.to_string())?;
        let port = parse_var("PORT", &defaults.port.to_string())?;

        Ok(Self { host, port })
    }
}

fn parse_var<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_or_default(key, default);
    raw.parse().map_err(|e: T::Err| ConfigError::ParseError {
        key: key.to_string(),
        details: format!("{:?}: {}", raw, e),
    })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
        }
    }
}
