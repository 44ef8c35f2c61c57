//! Blockchain RPC client with timeout, failover and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Forward raw EIP-1193 style requests
//! - Send transactions, signing locally when a key is loaded
//! - Verify the endpoint serves the configured chain

use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;

/// Methods that must reach exactly one endpoint. Retrying them elsewhere
/// could sign a second transaction.
const PRIMARY_ONLY_METHODS: &[&str] = &["eth_sendTransaction"];

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
    /// Whether providers sign with a local key.
    local_signer: bool,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// When `wallet` is given, every provider signs outgoing transactions
    /// locally and fills nonce, gas and chain id itself.
    pub fn new(config: BlockchainConfig, wallet: Option<&Wallet>) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(connect(primary_url, wallet));

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => providers.push(connect(url, wallet)),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            chain_id = config.chain_id,
            failovers = providers.len() - 1,
            local_signer = wallet.is_some(),
            "Blockchain client initialized"
        );

        Ok(Self {
            providers,
            config,
            timeout_duration,
            local_signer: wallet.is_some(),
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Forward a raw JSON-RPC request.
    ///
    /// Read-only methods fail over across providers; methods in
    /// [`PRIMARY_ONLY_METHODS`] are sent to the primary only.
    pub async fn raw_request(&self, method: &str, params: Value) -> BlockchainResult<Value> {
        let params = serde_json::value::to_raw_value(&params)
            .map_err(|e| BlockchainError::Rpc(format!("Unserializable params: {}", e)))?;
        let candidates = if PRIMARY_ONLY_METHODS.contains(&method) {
            &self.providers[..1]
        } else {
            &self.providers[..]
        };

        for (i, provider) in candidates.iter().enumerate() {
            let fut = provider.raw_request_dyn(Cow::Owned(method.to_string()), &params);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(raw)) => {
                    return serde_json::from_str(raw.get()).map_err(|e| {
                        BlockchainError::Rpc(format!("Malformed {} response: {}", method, e))
                    });
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC error");
                    if candidates.len() == 1 {
                        return Err(BlockchainError::Rpc(e.to_string()));
                    }
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, method, "RPC timeout");
                    if candidates.len() == 1 {
                        return Err(BlockchainError::Timeout(self.config.rpc_timeout_secs));
                    }
                }
            }
        }
        Err(BlockchainError::Rpc(format!("All providers failed for {}", method)))
    }

    /// Broadcast a transaction through the primary provider.
    ///
    /// Returns as soon as the node accepts it; confirmation is the caller's
    /// concern.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let fut = self.providers[0].send_transaction(tx);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(pending)) => {
                let tx_hash = *pending.tx_hash();
                tracing::info!(tx_hash = %tx_hash, "Transaction broadcast");
                Ok(tx_hash)
            }
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Whether transactions are signed with a locally loaded key.
    pub fn has_local_signer(&self) -> bool {
        self.local_signer
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }
}

fn connect(url: url::Url, wallet: Option<&Wallet>) -> Arc<dyn Provider + Send + Sync> {
    match wallet {
        Some(wallet) => Arc::new(
            ProviderBuilder::new()
                .wallet(wallet.ethereum_wallet())
                .connect_http(url),
        ) as Arc<dyn Provider + Send + Sync>,
        None => Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>,
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .field("local_signer", &self.local_signer)
            .finish()
    }
}
