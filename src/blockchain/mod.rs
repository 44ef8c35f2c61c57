//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment (private key) + config (RPC URLs)
//!     → wallet.rs (optional local key)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → wallet::node (EIP-1193 requests answered by a node)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
pub use wallet::Wallet;
