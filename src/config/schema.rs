//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files,
//! and every section has defaults so a bare `ChainConfig::default()` is a
//! runnable fixture.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::trace::Sampler;

/// Root configuration for the fixture.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ChainConfig {
    /// Stub server listener (bind address, port).
    pub listener: ListenerConfig,

    /// Chain endpoint addresses.
    pub endpoints: EndpointConfig,

    /// Tracer settings (sampling policy, log marker).
    pub trace: TraceConfig,

    /// Trace log stream locations.
    pub logs: LogConfig,
}

impl ChainConfig {
    /// Socket address string for the stub server listener.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.listener.bind_address, self.listener.port)
    }

    /// Base URL the chain and user client target by default.
    fn local_base_url(&self) -> String {
        format!("http://{}:{}", self.listener.bind_address, self.listener.port)
    }

    /// Resolve the three chain endpoint URLs in call order.
    pub fn chain_urls(&self) -> Result<[Url; 3], url::ParseError> {
        let base = self
            .endpoints
            .base_url
            .clone()
            .unwrap_or_else(|| self.local_base_url());
        Ok([
            Url::parse(&format!("{}{}", base, self.endpoints.first))?,
            Url::parse(&format!("{}{}", base, self.endpoints.second))?,
            Url::parse(&format!("{}{}", base, self.endpoints.third))?,
        ])
    }

    /// Resolve the user-lookup API base URL.
    pub fn user_api_url(&self) -> Result<Url, url::ParseError> {
        let base = self
            .endpoints
            .user_api_base
            .clone()
            .unwrap_or_else(|| self.local_base_url());
        Url::parse(&base)
    }
}

/// Listener configuration for the stub serving side.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (host only, no port).
    pub bind_address: String,

    /// Listening port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 23456,
        }
    }
}

/// Chain and user-API endpoint addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base address for the three chain endpoints. Defaults to the local
    /// stub server when unset.
    pub base_url: Option<String>,

    /// Path of the first chain endpoint.
    pub first: String,

    /// Path of the second chain endpoint.
    pub second: String,

    /// Path of the third chain endpoint.
    pub third: String,

    /// Base address of the user-lookup API. Defaults to the local stub
    /// server when unset.
    pub user_api_base: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            first: "/foo".to_string(),
            second: "/bar".to_string(),
            third: "/baz".to_string(),
            user_api_base: None,
        }
    }
}

/// Tracer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Sampling policy. Always-on by default: every chain run is traced.
    pub sampler: Sampler,

    /// Marker substring tagging the log lines the harness parses.
    pub marker: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            sampler: Sampler::Always,
            marker: "[TRACE_CHECK]".to_string(),
        }
    }
}

/// Trace log stream locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Producer-side stream, written by the stub server.
    pub producer_path: String,

    /// Test-side stream, written by the chain itself.
    pub test_path: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            producer_path: "target/log/producer.log".to_string(),
            test_path: "target/test_log/test.log".to_string(),
        }
    }
}
