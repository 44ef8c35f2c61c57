//! Transaction signers.
//!
//! # Responsibilities
//! - Send a transaction from the wallet's active account
//! - Poll for the receipt until it lands or the signer's timeout expires

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::{TransactionInput, TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::BlockchainConfig;
use crate::wallet::eip1193::{RpcRequest, Transport};
use crate::wallet::{WalletError, WalletResult};

/// Capability to authorize and broadcast transactions for one account.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// The account transactions are sent from.
    fn address(&self) -> Address;

    /// Sign and broadcast. Resolves once the wallet hands back a hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> WalletResult<TxHash>;

    /// Wait until the transaction is mined.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> WalletResult<TransactionReceipt>;
}

/// How a signer waits for receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl ConfirmationPolicy {
    pub fn from_config(config: &BlockchainConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            timeout: Duration::from_secs(config.confirmation_timeout_secs),
        }
    }
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self::from_config(&BlockchainConfig::default())
    }
}

/// A signer bound to one account of a connected wallet.
#[derive(Debug, Clone)]
pub struct WalletSigner {
    transport: Transport,
    address: Address,
    policy: ConfirmationPolicy,
}

impl WalletSigner {
    pub(crate) fn new(transport: Transport, address: Address, policy: ConfirmationPolicy) -> Self {
        Self {
            transport,
            address,
            policy,
        }
    }

    /// Which transport this signer was built on.
    pub fn transport_kind(&self) -> &'static str {
        self.transport.kind()
    }
}

#[async_trait]
impl TransactionSigner for WalletSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> WalletResult<TxHash> {
        let mut tx = tx.with_from(self.address);
        // some injected wallets only read `data`
        if let Some(calldata) = tx.input.input().cloned() {
            tx.input = TransactionInput::both(calldata);
        }
        let params = json!([tx]);
        let response = self
            .transport
            .request(RpcRequest::new("eth_sendTransaction", params))
            .await?;

        serde_json::from_value(response).map_err(|e| WalletError::BadResponse {
            method: "eth_sendTransaction",
            message: e.to_string(),
        })
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> WalletResult<TransactionReceipt> {
        let result = timeout(self.policy.timeout, async {
            let mut ticker = interval(self.policy.poll_interval);

            loop {
                ticker.tick().await;

                let response = self
                    .transport
                    .request(RpcRequest::new("eth_getTransactionReceipt", json!([tx_hash])))
                    .await?;

                if response == Value::Null {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                }

                return serde_json::from_value::<TransactionReceipt>(response).map_err(|e| {
                    WalletError::BadResponse {
                        method: "eth_getTransactionReceipt",
                        message: e.to_string(),
                    }
                });
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(WalletError::ConfirmationTimeout {
                tx_hash,
                secs: self.policy.timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::eip1193::Eip1193Provider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Answers sendTransaction with a fixed hash and never mines it.
    #[derive(Default)]
    struct PendingForever {
        sent: Mutex<Vec<Value>>,
        polls: AtomicUsize,
    }

    #[async_trait]
    impl Eip1193Provider for PendingForever {
        async fn request(&self, request: RpcRequest) -> WalletResult<Value> {
            match request.method.as_str() {
                "eth_sendTransaction" => {
                    self.sent.lock().unwrap().push(request.params);
                    Ok(json!(TxHash::repeat_byte(0xab)))
                }
                "eth_getTransactionReceipt" => {
                    self.polls.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Null)
                }
                other => Err(WalletError::Request {
                    method: other.to_string(),
                    message: "unsupported".to_string(),
                }),
            }
        }
    }

    fn fast_policy() -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(10),
            timeout: Duration::from_millis(100),
        }
    }

    #[tokio::test]
    async fn test_send_sets_from() {
        let provider = Arc::new(PendingForever::default());
        let from = Address::repeat_byte(0x11);
        let signer = WalletSigner::new(Transport::Injected(provider.clone()), from, fast_policy());

        let tx_hash = signer
            .send_transaction(TransactionRequest::default().with_to(Address::repeat_byte(0x22)))
            .await
            .unwrap();
        assert_eq!(tx_hash, TxHash::repeat_byte(0xab));

        let sent = provider.sent.lock().unwrap();
        let from_field = sent[0][0]["from"].as_str().unwrap().to_lowercase();
        assert_eq!(from_field, format!("{:?}", from).to_lowercase());
    }

    #[tokio::test]
    async fn test_calldata_sent_as_input_and_data() {
        let provider = Arc::new(PendingForever::default());
        let signer = WalletSigner::new(
            Transport::Injected(provider.clone()),
            Address::repeat_byte(0x11),
            fast_policy(),
        );

        signer
            .send_transaction(
                TransactionRequest::default()
                    .with_to(Address::repeat_byte(0x22))
                    .with_input(vec![0xf1, 0x73, 0x25, 0xe7]),
            )
            .await
            .unwrap();

        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent[0][0]["input"], json!("0xf17325e7"));
        assert_eq!(sent[0][0]["data"], json!("0xf17325e7"));
    }

    #[tokio::test]
    async fn test_receipt_wait_times_out() {
        let provider = Arc::new(PendingForever::default());
        let signer = WalletSigner::new(
            Transport::Injected(provider.clone()),
            Address::ZERO,
            fast_policy(),
        );

        let err = signer
            .wait_for_receipt(TxHash::repeat_byte(0xab))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::ConfirmationTimeout { .. }));
        assert!(provider.polls.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_policy_from_config() {
        let policy = ConfirmationPolicy::default();
        assert_eq!(policy.poll_interval, Duration::from_millis(2000));
        assert_eq!(policy.timeout, Duration::from_secs(120));
    }
}
