//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → SchemaDescriptor / BlockchainConfig injected at construction
//! ```
//!
//! Config is read once at startup. Every field has a default so a missing
//! file means "attest on Base with the content-hash schema".

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, AttestationConfig, BlockchainConfig, ObservabilityConfig};
