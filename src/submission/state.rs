//! Submission phases and errors.

use serde::Serialize;
use thiserror::Error;

use crate::attestation::{AttestError, AttestationResult};
use crate::canonical::ProcessedInput;
use crate::wallet::WalletError;

/// Where the controller is in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// No input yet.
    #[default]
    Idle,
    /// Input entered; canonicalization ran (and may have been rejected).
    Processing,
    /// Submit pressed; checking preconditions.
    Validating,
    /// Waiting for the wallet to hand out a signer.
    AwaitingSigner,
    /// Transaction sent, waiting for confirmation.
    Submitting,
    Succeeded(AttestationResult),
    Failed(SubmitError),
}

impl Phase {
    /// True while a submission owns the controller.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Phase::Validating | Phase::AwaitingSigner | Phase::Submitting
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Processing => "processing",
            Phase::Validating => "validating",
            Phase::AwaitingSigner => "awaiting_signer",
            Phase::Submitting => "submitting",
            Phase::Succeeded(_) => "succeeded",
            Phase::Failed(_) => "failed",
        }
    }
}

/// A failed submit action, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Nothing valid to submit.
    #[error("{0}")]
    Precondition(String),

    #[error("Wallet not connected")]
    NoWallet,

    #[error("Failed to get signer from wallet: {0}")]
    NoSigner(String),

    /// Schema encoding failed on a canonical value.
    #[error("Could not encode attestation data: {0}")]
    Encoding(String),

    #[error("{0}")]
    Transaction(String),

    /// Another submission from this controller is still pending.
    #[error("A submission is already in progress")]
    InFlight,

    /// The caller stopped waiting. A broadcast transaction may still land.
    #[error("Submission abandoned before confirmation")]
    Abandoned,
}

impl SubmitError {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Precondition(_) => "precondition",
            SubmitError::NoWallet => "no_wallet",
            SubmitError::NoSigner(_) => "no_signer",
            SubmitError::Encoding(_) => "encoding",
            SubmitError::Transaction(_) => "transaction",
            SubmitError::InFlight => "in_flight",
            SubmitError::Abandoned => "abandoned",
        }
    }

    /// Raised before anything was sent to a wallet or the network.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SubmitError::Precondition(_) | SubmitError::NoWallet | SubmitError::InFlight
        )
    }

    /// One line for the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Classify a failure to obtain a signer.
    ///
    /// A missing wallet or account needs a (re)connection; a declined
    /// prompt or a transport failure can simply be retried.
    pub(crate) fn from_signer(err: WalletError) -> Self {
        match err {
            WalletError::NotConnected => SubmitError::NoWallet,
            WalletError::AccountUnavailable(_) => SubmitError::NoSigner(err.to_string()),
            WalletError::Rejected(_)
            | WalletError::Request { .. }
            | WalletError::BadResponse { .. }
            | WalletError::ConfirmationTimeout { .. } => {
                SubmitError::Transaction(format!("Failed to get signer from wallet: {}", err))
            }
        }
    }
}

impl From<AttestError> for SubmitError {
    fn from(err: AttestError) -> Self {
        match err {
            AttestError::NoSigner => SubmitError::NoSigner(err.to_string()),
            AttestError::Encoding(message) => SubmitError::Encoding(message),
            AttestError::Transaction(_)
            | AttestError::Reverted(_)
            | AttestError::MissingAttestation(_) => SubmitError::Transaction(err.to_string()),
        }
    }
}

/// Read-only view of the controller for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub phase: &'static str,
    pub input: Option<ProcessedInput>,
    /// Inline canonicalization message.
    pub input_message: Option<String>,
    pub result: Option<AttestationResult>,
    pub error: Option<String>,
    pub wallet_connected: bool,
}
