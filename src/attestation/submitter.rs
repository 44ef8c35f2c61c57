//! Attestation submission.
//!
//! # Responsibilities
//! - Bind to the EAS contract and connect a signer
//! - Encode the content hash under the schema
//! - Send `attest`, wait for the receipt, pull the UID from `Attested`
//!
//! Submission is not idempotent: the same content hash attested twice
//! yields two attestations.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, B256};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;
use std::sync::Arc;

use crate::attestation::contract::IEAS;
use crate::attestation::schema::AttestationSettings;
use crate::attestation::types::{AttestError, AttestResult, AttestationRequest, AttestationResult};
use crate::canonical::ContentHash;
use crate::wallet::TransactionSigner;

/// Schema field the content hash is encoded into.
pub const CONTENT_HASH_FIELD: &str = "contentHash";

/// Client for one EAS contract.
#[derive(Clone)]
pub struct Eas {
    contract: Address,
    signer: Option<Arc<dyn TransactionSigner>>,
}

impl Eas {
    /// Bind to the contract at `contract`. No signer yet.
    pub fn new(contract: Address) -> Self {
        Self {
            contract,
            signer: None,
        }
    }

    /// Attach the signer that pays for and authors attestations.
    pub fn connect(&mut self, signer: Arc<dyn TransactionSigner>) {
        self.signer = Some(signer);
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Send one attestation and wait for its UID.
    pub async fn attest(&self, request: &AttestationRequest) -> AttestResult<AttestationResult> {
        let signer = self.signer.as_ref().ok_or(AttestError::NoSigner)?;

        let call = IEAS::attestCall {
            request: request.into(),
        };
        let tx = TransactionRequest::default()
            .with_to(self.contract)
            .with_input(call.abi_encode())
            .with_value(request.value);

        let tx_hash = signer.send_transaction(tx).await?;
        tracing::info!(
            tx_hash = %tx_hash,
            attester = %signer.address(),
            schema = %request.schema,
            "Attestation transaction sent"
        );

        let receipt = signer.wait_for_receipt(tx_hash).await?;
        if !receipt.status() {
            return Err(AttestError::Reverted(tx_hash));
        }

        let uid = attested_uid(&receipt, self.contract, request.schema)
            .ok_or(AttestError::MissingAttestation(tx_hash))?;

        tracing::info!(
            tx_hash = %tx_hash,
            uid = %uid,
            block_number = ?receipt.block_number,
            "Attestation confirmed"
        );

        Ok(AttestationResult { uid, tx_hash })
    }
}

impl std::fmt::Debug for Eas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Eas")
            .field("contract", &self.contract)
            .field("signer", &self.signer.as_ref().map(|s| s.address()))
            .finish()
    }
}

/// UID from the first `Attested` log of `contract` for `schema`.
pub fn attested_uid(receipt: &TransactionReceipt, contract: Address, schema: B256) -> Option<B256> {
    receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.address() == contract)
        .filter_map(|log| log.log_decode::<IEAS::Attested>().ok())
        .map(|decoded| decoded.inner.data)
        .find(|event| event.schemaUID == schema)
        .map(|event| event.uid)
}

/// Encodes content hashes and submits them under the configured schema.
#[derive(Debug, Clone)]
pub struct AttestationSubmitter {
    settings: Arc<AttestationSettings>,
}

impl AttestationSubmitter {
    pub fn new(settings: Arc<AttestationSettings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AttestationSettings {
        &self.settings
    }

    /// Build the request for `hash` without sending anything.
    pub fn build_request(&self, hash: &ContentHash) -> AttestResult<AttestationRequest> {
        let schema = &self.settings.schema;
        let data = schema
            .encoder
            .encode_data(&[(CONTENT_HASH_FIELD, hash.as_str())])?;
        Ok(AttestationRequest::new(schema.uid, data))
    }

    /// Attest `hash` with `signer`.
    pub async fn submit(
        &self,
        signer: Option<Arc<dyn TransactionSigner>>,
        hash: &ContentHash,
    ) -> AttestResult<AttestationResult> {
        let mut eas = Eas::new(self.settings.contract_address);
        if let Some(signer) = signer {
            eas.connect(signer);
        }

        let request = self.build_request(hash)?;
        eas.attest(&request).await
    }
}
