//! Wallet signer acquisition.
//!
//! # Data Flow
//! ```text
//! WalletClient (connected status, active account, request dispatch)
//!     → eip1193.rs (Transport: injected provider | request shim)
//!     → adapter.rs (eth_requestAccounts, bind active account)
//!     → signer.rs  (WalletSigner: eth_sendTransaction, receipt polling)
//! ```
//!
//! `node.rs` is the wallet client the command line uses: a JSON-RPC node,
//! optionally fronted by a local key.

pub mod adapter;
pub mod eip1193;
pub mod node;
pub mod signer;

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

pub use adapter::{acquire_signer, SignerAdapter, WalletProvider};
pub use eip1193::{Eip1193Provider, RpcRequest, Transport, WalletClient};
pub use node::NodeWalletClient;
pub use signer::{ConfirmationPolicy, TransactionSigner, WalletSigner};

/// EIP-1193 "user rejected request" code.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors raised while obtaining or using a wallet signer.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No wallet client, or the client has no active account.
    #[error("Wallet not connected")]
    NotConnected,

    /// The wallet did not grant access to the active account.
    #[error("Account {0} is not available in the connected wallet")]
    AccountUnavailable(Address),

    /// The user declined in the wallet UI.
    #[error("Request rejected in wallet: {0}")]
    Rejected(String),

    /// The wallet or its node returned an error.
    #[error("{method} failed: {message}")]
    Request { method: String, message: String },

    /// The wallet answered with something unparseable.
    #[error("Unexpected {method} response: {message}")]
    BadResponse {
        method: &'static str,
        message: String,
    },

    /// No receipt arrived within the signer's confirmation timeout.
    #[error("Transaction {tx_hash} not confirmed after {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },
}

impl WalletError {
    /// Classify a JSON-RPC error object returned by a wallet.
    pub fn from_rpc_error(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == USER_REJECTED_CODE {
            WalletError::Rejected(message)
        } else {
            WalletError::Request {
                method: format!("wallet request (code {})", code),
                message,
            }
        }
    }
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_classification() {
        assert!(matches!(
            WalletError::from_rpc_error(4001, "User denied"),
            WalletError::Rejected(m) if m == "User denied"
        ));
        let err = WalletError::from_rpc_error(-32000, "insufficient funds");
        assert_eq!(
            err.to_string(),
            "wallet request (code -32000) failed: insufficient funds"
        );
    }
}
