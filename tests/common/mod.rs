//! Shared wallet fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{keccak256, Address, Bloom, Bytes, TxHash, B256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use cast_attest::attestation::contract::IEAS;
use cast_attest::attestation::{AttestationSettings, SchemaDescriptor, SchemaEncoder};
use cast_attest::wallet::{ConfirmationPolicy, RpcRequest, WalletClient, WalletError, WalletResult};

pub const ACCOUNT: Address = Address::repeat_byte(0xaa);
pub const CONTRACT: Address = Address::repeat_byte(0x21);
pub const SCHEMA_UID: B256 = B256::repeat_byte(0xdf);

pub fn settings() -> Arc<AttestationSettings> {
    Arc::new(AttestationSettings {
        contract_address: CONTRACT,
        schema: SchemaDescriptor {
            uid: SCHEMA_UID,
            encoder: SchemaEncoder::parse("bytes32 contentHash").unwrap(),
        },
    })
}

pub fn fast_policy() -> ConfirmationPolicy {
    ConfirmationPolicy {
        poll_interval: Duration::from_millis(10),
        timeout: Duration::from_secs(2),
    }
}

/// What the mock wallet does with `eth_sendTransaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendBehavior {
    /// Mine successfully with an `Attested` log.
    Mine,
    /// Mine with status 0 and no logs.
    Revert,
    /// User declines in the wallet.
    Reject,
}

/// In-memory wallet that mines every attestation instantly.
pub struct MockWallet {
    connected: bool,
    behavior: SendBehavior,
    gate: Option<Arc<Notify>>,
    nonce: AtomicU64,
    receipts: Mutex<HashMap<TxHash, Value>>,
    methods: Mutex<Vec<String>>,
    sent: Mutex<Vec<TransactionRequest>>,
    attested: Mutex<Vec<(B256, Bytes)>>,
}

impl MockWallet {
    pub fn new(behavior: SendBehavior) -> Self {
        Self {
            connected: true,
            behavior,
            gate: None,
            nonce: AtomicU64::new(0),
            receipts: Mutex::new(HashMap::new()),
            methods: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            attested: Mutex::new(Vec::new()),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new(SendBehavior::Mine)
        }
    }

    /// Account requests block until `gate` is notified.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(SendBehavior::Mine)
        }
    }

    pub fn methods(&self) -> Vec<String> {
        self.methods.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// `(schema, data)` of every decoded `attest` call.
    pub fn attested(&self) -> Vec<(B256, Bytes)> {
        self.attested.lock().unwrap().clone()
    }

    fn send(&self, params: &Value) -> WalletResult<Value> {
        if self.behavior == SendBehavior::Reject {
            return Err(WalletError::from_rpc_error(4001, "User rejected the request."));
        }

        let tx: TransactionRequest =
            serde_json::from_value(params[0].clone()).map_err(|e| bad_request(e.to_string()))?;
        let input = tx.input.input().cloned().unwrap_or_default();
        let call = IEAS::attestCall::abi_decode(&input).map_err(|e| bad_request(e.to_string()))?;

        let n = self.nonce.fetch_add(1, Ordering::SeqCst);
        let tx_hash = keccak256(format!("tx-{}", n));
        let uid = keccak256(format!("uid-{}", n));

        let mined = self.behavior == SendBehavior::Mine;
        let receipt = receipt_json(tx_hash, ACCOUNT, call.request.schema, uid, mined);

        self.attested
            .lock()
            .unwrap()
            .push((call.request.schema, call.request.data.data.clone()));
        self.sent.lock().unwrap().push(tx);
        self.receipts.lock().unwrap().insert(tx_hash, receipt);
        Ok(json!(tx_hash))
    }
}

fn bad_request(message: String) -> WalletError {
    WalletError::Request {
        method: "eth_sendTransaction".to_string(),
        message,
    }
}

#[async_trait]
impl WalletClient for MockWallet {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn account(&self) -> Option<Address> {
        self.connected.then_some(ACCOUNT)
    }

    async fn request(&self, request: RpcRequest) -> WalletResult<Value> {
        self.methods.lock().unwrap().push(request.method.clone());
        match request.method.as_str() {
            "eth_requestAccounts" => {
                if let Some(gate) = &self.gate {
                    gate.notified().await;
                }
                Ok(json!([ACCOUNT]))
            }
            "eth_sendTransaction" => self.send(&request.params),
            "eth_getTransactionReceipt" => {
                let tx_hash: TxHash = serde_json::from_value(request.params[0].clone())
                    .map_err(|e| bad_request(e.to_string()))?;
                Ok(self
                    .receipts
                    .lock()
                    .unwrap()
                    .get(&tx_hash)
                    .cloned()
                    .unwrap_or(Value::Null))
            }
            other => Err(WalletError::Request {
                method: other.to_string(),
                message: "unsupported".to_string(),
            }),
        }
    }
}

/// An EIP-1559 receipt as a node would return it.
pub fn receipt_json(tx_hash: TxHash, from: Address, schema: B256, uid: B256, mined: bool) -> Value {
    let block_hash = B256::repeat_byte(0xbb);
    let logs = if mined {
        json!([{
            "address": CONTRACT,
            "topics": [
                IEAS::Attested::SIGNATURE_HASH,
                Address::ZERO.into_word(),
                from.into_word(),
                schema,
            ],
            "data": Bytes::copy_from_slice(uid.as_slice()),
            "blockHash": block_hash,
            "blockNumber": "0x10",
            "transactionHash": tx_hash,
            "transactionIndex": "0x0",
            "logIndex": "0x0",
            "removed": false,
        }])
    } else {
        json!([])
    };

    json!({
        "type": "0x2",
        "status": if mined { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": logs,
        "logsBloom": Bloom::ZERO,
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": block_hash,
        "blockNumber": "0x10",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": from,
        "to": CONTRACT,
        "contractAddress": null,
    })
}

/// The UID the mock assigns to its `n`th transaction.
pub fn expected_uid(n: u64) -> B256 {
    keccak256(format!("uid-{}", n))
}
