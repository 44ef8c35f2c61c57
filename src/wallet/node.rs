//! Wallet client backed by a JSON-RPC node.
//!
//! With a local key, account queries are answered locally and
//! `eth_sendTransaction` is signed in-process, then broadcast raw. Without
//! one, the node's own (unlocked) account signs.

use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::blockchain::{BlockchainClient, BlockchainError};
use crate::wallet::eip1193::{RpcRequest, WalletClient};
use crate::wallet::{WalletError, WalletResult};

#[derive(Debug, Clone)]
pub struct NodeWalletClient {
    client: BlockchainClient,
    account: Option<Address>,
}

impl NodeWalletClient {
    /// `account` is the local key's address, or a node-managed account.
    pub fn new(client: BlockchainClient, account: Option<Address>) -> Self {
        Self { client, account }
    }

    async fn send_transaction(&self, params: Value) -> WalletResult<Value> {
        let tx = params
            .get(0)
            .cloned()
            .ok_or_else(|| WalletError::Request {
                method: "eth_sendTransaction".to_string(),
                message: "missing transaction object".to_string(),
            })?;
        let tx: TransactionRequest =
            serde_json::from_value(tx).map_err(|e| WalletError::Request {
                method: "eth_sendTransaction".to_string(),
                message: format!("malformed transaction: {}", e),
            })?;

        let tx_hash = self
            .client
            .send_transaction(tx)
            .await
            .map_err(|e| node_error("eth_sendTransaction", e))?;
        Ok(json!(tx_hash))
    }
}

fn node_error(method: &str, err: BlockchainError) -> WalletError {
    WalletError::Request {
        method: method.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl WalletClient for NodeWalletClient {
    fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    fn account(&self) -> Option<Address> {
        self.account
    }

    async fn request(&self, request: RpcRequest) -> WalletResult<Value> {
        let RpcRequest { method, params } = request;
        match method.as_str() {
            "eth_accounts" | "eth_requestAccounts" if self.client.has_local_signer() => {
                Ok(json!(self.account.into_iter().collect::<Vec<_>>()))
            }
            // Nodes do not prompt; account access is whatever they manage.
            "eth_requestAccounts" => self
                .client
                .raw_request("eth_accounts", params)
                .await
                .map_err(|e| node_error(&method, e)),
            "eth_sendTransaction" => self.send_transaction(params).await,
            _ => self
                .client
                .raw_request(&method, params)
                .await
                .map_err(|e| node_error(&method, e)),
        }
    }
}
