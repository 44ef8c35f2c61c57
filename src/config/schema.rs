//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file, and
//! every section has defaults so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Attestation contract and schema.
    pub attestation: AttestationConfig,

    /// JSON-RPC connection and signing client settings.
    pub blockchain: BlockchainConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Fixed attestation target.
///
/// Changing any of these is a configuration change; they are never mutated
/// after startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttestationConfig {
    /// EAS contract address.
    pub contract_address: String,

    /// Schema UID registered with the schema registry.
    pub schema_uid: String,

    /// Schema string, e.g. `"bytes32 contentHash"`.
    pub schema: String,
}

impl Default for AttestationConfig {
    fn default() -> Self {
        Self {
            // EAS predeploy on OP-stack chains (Base).
            contract_address: "0x4200000000000000000000000000000000000021".to_string(),
            schema_uid: "0xdf4c41ea0f6263c72aa385580124f41f2898d3613e86c50519fc3cfd7ff13ad4"
                .to_string(),
            schema: "bytes32 contentHash".to_string(),
        }
    }
}

/// Blockchain connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (8453 for Base mainnet, 84532 for Base Sepolia).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long the signer waits for a receipt before giving up.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Node-managed account to sign with when no local key is provided.
    pub account: Option<String>,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://mainnet.base.org".to_string(),
            failover_urls: Vec::new(),
            chain_id: 8453,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
            account: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
