//! Attestation request/result types and errors.

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use serde::Serialize;
use thiserror::Error;

use crate::attestation::contract::IEAS;
use crate::wallet::WalletError;

/// Errors raised while encoding or submitting an attestation.
#[derive(Debug, Error)]
pub enum AttestError {
    /// `attest` was called before a signer was connected.
    #[error("No signer connected")]
    NoSigner,

    /// The payload does not fit the schema.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The wallet refused, the network failed, or confirmation timed out.
    #[error("Transaction failed: {0}")]
    Transaction(#[from] WalletError),

    /// The transaction was mined but reverted.
    #[error("Transaction {0} reverted")]
    Reverted(TxHash),

    /// The receipt carries no `Attested` event from the bound contract.
    #[error("Transaction {0} emitted no attestation")]
    MissingAttestation(TxHash),
}

/// Result type for attestation operations.
pub type AttestResult<T> = Result<T, AttestError>;

/// One attestation to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationRequest {
    pub schema: B256,
    /// `Address::ZERO` means "no specific recipient".
    pub recipient: Address,
    /// Unix seconds; 0 never expires.
    pub expiration_time: u64,
    pub revocable: bool,
    pub ref_uid: B256,
    pub data: Bytes,
    /// Native value sent along with the attestation.
    pub value: U256,
}

impl AttestationRequest {
    /// A revocable request with no recipient, no expiry, no reference and no value.
    pub fn new(schema: B256, data: Bytes) -> Self {
        Self {
            schema,
            recipient: Address::ZERO,
            expiration_time: 0,
            revocable: true,
            ref_uid: B256::ZERO,
            data,
            value: U256::ZERO,
        }
    }
}

impl From<&AttestationRequest> for IEAS::AttestationRequest {
    fn from(request: &AttestationRequest) -> Self {
        IEAS::AttestationRequest {
            schema: request.schema,
            data: IEAS::AttestationRequestData {
                recipient: request.recipient,
                expirationTime: request.expiration_time,
                revocable: request.revocable,
                refUID: request.ref_uid,
                data: request.data.clone(),
                value: request.value,
            },
        }
    }
}

/// A confirmed attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttestationResult {
    /// Attestation UID assigned by the contract.
    pub uid: B256,
    pub tx_hash: TxHash,
}

impl AttestationResult {
    /// Identifier shown to the user.
    pub fn confirmation_id(&self) -> String {
        self.uid.to_string()
    }
}
