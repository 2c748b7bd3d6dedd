//! HTTP listener settings.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Where the evaluation API listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for `/health` and `/api/v1/evaluate`.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// IP address to bind.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
        }
    }
}

impl ServerConfig {
    /// Listener address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `bind_address` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.bind_address.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "server.bind_address '{}' is not an IP address",
                self.bind_address
            ))
        })?;
        Ok(SocketAddr::new(ip, self.http_port))
    }
}

const fn default_http_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv6_bind_address() {
        let config = ServerConfig {
            http_port: 8181,
            bind_address: "::1".to_string(),
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "[::1]:8181");
    }

    #[test]
    fn hostname_rejected() {
        let config = ServerConfig {
            bind_address: "localhost".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
