//! Relay configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::errors::ConfigError;
use crate::hub::DEFAULT_SUBSCRIBER_BUFFER;
use crate::ports::outbound::SubscriptionScope;

/// Relay startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// MSP the relay identity belongs to
    pub msp_id: String,

    /// Identity certificate (PEM)
    pub cert_path: PathBuf,

    /// Identity private key (PEM)
    pub key_path: PathBuf,

    /// Event bridge in front of the ledger peer, `host:port` or a full
    /// `ws://`/`wss://` URL
    pub peer_endpoint: String,

    /// CA certificate used to verify the peer (PEM)
    pub tls_ca_path: PathBuf,

    /// Ledger channel to subscribe on
    pub channel_name: String,

    /// Contract whose events are relayed
    pub contract_name: String,

    /// Subscriber listener host
    pub ws_host: String,

    /// Subscriber listener port
    pub ws_port: u16,

    /// Per-subscriber queue capacity
    pub subscriber_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            msp_id: "ManufacturerMSP".to_string(),
            cert_path: PathBuf::from("/crypto/admin-cert.pem"),
            key_path: PathBuf::from("/crypto/admin-key.pem"),
            peer_endpoint: "peer0.manufacturer.example.com:7051".to_string(),
            tls_ca_path: PathBuf::from("/crypto/ca.pem"),
            channel_name: "supplychain".to_string(),
            contract_name: "shipping".to_string(),
            ws_host: "0.0.0.0".to_string(),
            ws_port: 3001,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
        }
    }
}

impl RelayConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MSP_ID`: identity MSP (default: ManufacturerMSP)
    /// - `CERT_PATH`: identity certificate (default: /crypto/admin-cert.pem)
    /// - `KEY_PATH`: identity private key (default: /crypto/admin-key.pem)
    /// - `PEER_ENDPOINT`: event bridge address (default: peer0.manufacturer.example.com:7051)
    /// - `TLS_CA`: TLS CA certificate (default: /crypto/ca.pem)
    /// - `CHANNEL_NAME`: ledger channel (default: supplychain)
    /// - `CONTRACT_NAME`: contract name (default: shipping)
    /// - `WS_HOST`: listener host (default: 0.0.0.0)
    /// - `WS_PORT`: listener port (default: 3001)
    /// - `SUBSCRIBER_BUFFER`: per-subscriber queue capacity (default: 64)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            msp_id: lookup("MSP_ID").unwrap_or(defaults.msp_id),
            cert_path: lookup("CERT_PATH").map(PathBuf::from).unwrap_or(defaults.cert_path),
            key_path: lookup("KEY_PATH").map(PathBuf::from).unwrap_or(defaults.key_path),
            peer_endpoint: lookup("PEER_ENDPOINT").unwrap_or(defaults.peer_endpoint),
            tls_ca_path: lookup("TLS_CA").map(PathBuf::from).unwrap_or(defaults.tls_ca_path),
            channel_name: lookup("CHANNEL_NAME").unwrap_or(defaults.channel_name),
            contract_name: lookup("CONTRACT_NAME").unwrap_or(defaults.contract_name),
            ws_host: lookup("WS_HOST").unwrap_or(defaults.ws_host),
            ws_port: parse_var(&lookup, "WS_PORT", defaults.ws_port)?,
            subscriber_buffer: parse_var(&lookup, "SUBSCRIBER_BUFFER", defaults.subscriber_buffer)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("MSP_ID", self.msp_id.as_str()),
            ("PEER_ENDPOINT", self.peer_endpoint.as_str()),
            ("CHANNEL_NAME", self.channel_name.as_str()),
            ("CONTRACT_NAME", self.contract_name.as_str()),
            ("WS_HOST", self.ws_host.as_str()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Empty(*name));
        }

        if self.subscriber_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                var: "SUBSCRIBER_BUFFER",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Address the subscriber endpoint binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.ws_host, self.ws_port)
    }

    /// Event subscription scope.
    pub fn scope(&self) -> SubscriptionScope {
        SubscriptionScope::new(&self.channel_name, &self.contract_name)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
