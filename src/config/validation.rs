//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. Validation is a pure
//! function that reports every problem, not just the first.

use alloy::primitives::{Address, B256};
use std::fmt;
use std::net::SocketAddr;

use crate::attestation::{SchemaEncoder, CONTENT_HASH_FIELD};
use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let attestation = &config.attestation;
    if let Err(e) = attestation.contract_address.parse::<Address>() {
        errors.push(ValidationError::new(
            "attestation.contract_address",
            format!("not an address: {}", e),
        ));
    }
    if let Err(e) = attestation.schema_uid.parse::<B256>() {
        errors.push(ValidationError::new(
            "attestation.schema_uid",
            format!("not a 32-byte hex value: {}", e),
        ));
    }
    match SchemaEncoder::parse(&attestation.schema) {
        Ok(encoder) if encoder.field(CONTENT_HASH_FIELD).is_none() => {
            errors.push(ValidationError::new(
                "attestation.schema",
                "schema has no contentHash field",
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("attestation.schema", e.to_string())),
    }

    let chain = &config.blockchain;
    if let Err(e) = chain.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("invalid URL: {}", e),
        ));
    }
    if chain.chain_id == 0 {
        errors.push(ValidationError::new("blockchain.chain_id", "must be non-zero"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.rpc_timeout_secs",
            "must be greater than 0",
        ));
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "blockchain.poll_interval_ms",
            "must be greater than 0",
        ));
    }
    if let Some(account) = &chain.account {
        if account.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                "blockchain.account",
                format!("not an address: {}", account),
            ));
        }
    }

    let obs = &config.observability;
    if !matches!(
        obs.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level {:?}", obs.log_level),
        ));
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a socket address: {}", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
