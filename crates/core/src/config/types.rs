use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub ingest: IngestConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Ingestion service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Ingestion service base URL (e.g., "http://localhost:8000")
    pub url: String,
    /// Request timeout in seconds (default: 120). Covers the whole
    /// exchange including server-side analysis of the document.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Submitter tag sent as the `uploaded_by` form field. Omitted from
    /// requests when unset; the service then applies its own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter: Option<String>,
}

fn default_timeout() -> u64 {
    120
}
