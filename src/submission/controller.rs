//! Submission controller.
//!
//! Owns the current input and the submission phase. Input edits
//! canonicalize synchronously; `submit` runs one attestation at a time
//! and always leaves the controller in `Succeeded` or `Failed`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use crate::attestation::{AttestError, AttestationResult, AttestationSettings, AttestationSubmitter};
use crate::canonical::{canonicalize, CanonicalResult, ContentHash, InputMode, ProcessedInput};
use crate::observability::metrics;
use crate::submission::state::{ControllerSnapshot, Phase, SubmitError};
use crate::wallet::{acquire_signer, ConfirmationPolicy, TransactionSigner, WalletClient};

/// Message for a submit with nothing canonical to attest.
pub const NO_INPUT_MESSAGE: &str = "No processed hex data available. Enter a valid input first.";

#[derive(Default)]
struct ControllerState {
    phase: Phase,
    input: Option<ProcessedInput>,
    input_message: Option<String>,
    wallet: Option<Arc<dyn WalletClient>>,
}

/// Drives input → canonical value → attestation.
pub struct SubmissionController {
    submitter: AttestationSubmitter,
    policy: ConfirmationPolicy,
    state: Mutex<ControllerState>,
}

impl SubmissionController {
    pub fn new(
        settings: Arc<AttestationSettings>,
        policy: ConfirmationPolicy,
        wallet: Option<Arc<dyn WalletClient>>,
    ) -> Self {
        Self {
            submitter: AttestationSubmitter::new(settings),
            policy,
            state: Mutex::new(ControllerState {
                wallet,
                ..ControllerState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the wallet client. `None` disconnects.
    pub fn set_wallet(&self, wallet: Option<Arc<dyn WalletClient>>) {
        self.state().wallet = wallet;
    }

    pub fn wallet_connected(&self) -> bool {
        self.state()
            .wallet
            .as_ref()
            .map(|w| w.is_connected())
            .unwrap_or(false)
    }

    /// Canonicalize `raw` and make it the value the next submit attests.
    ///
    /// A rejected input clears the canonical value and leaves an inline
    /// message. An in-flight submission keeps the hash it started with.
    pub fn set_input(&self, mode: InputMode, raw: &str) -> CanonicalResult<Option<ProcessedInput>> {
        let mut state = self.state();
        let in_flight = state.phase.is_in_flight();

        if raw.is_empty() {
            state.input = None;
            state.input_message = None;
            if !in_flight {
                state.phase = Phase::Idle;
            }
            return Ok(None);
        }

        if !in_flight {
            state.phase = Phase::Processing;
        }

        match canonicalize(mode, raw) {
            Ok(processed) => {
                tracing::debug!(mode = %mode, hash = %processed.hash, "Input canonicalized");
                state.input = Some(processed.clone());
                state.input_message = None;
                Ok(Some(processed))
            }
            Err(e) => {
                tracing::debug!(mode = %mode, error = %e, "Input rejected");
                state.input = None;
                state.input_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The value the next submit would attest.
    pub fn content_hash(&self) -> Option<ContentHash> {
        self.state().input.as_ref().map(|p| p.hash.clone())
    }

    pub fn phase(&self) -> Phase {
        self.state().phase.clone()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.state();
        let (result, error) = match &state.phase {
            Phase::Succeeded(result) => (Some(*result), None),
            Phase::Failed(e) => (None, Some(e.user_message())),
            _ => (None, None),
        };
        ControllerSnapshot {
            phase: state.phase.name(),
            input: state.input.clone(),
            input_message: state.input_message.clone(),
            result,
            error,
            wallet_connected: state
                .wallet
                .as_ref()
                .map(|w| w.is_connected())
                .unwrap_or(false),
        }
    }

    /// Attest the current canonical value.
    ///
    /// Rejected with [`SubmitError::InFlight`] while another submission
    /// is pending; the pending one is unaffected. Every accepted call
    /// ends in `Succeeded` or `Failed`, including when the returned
    /// future is dropped early.
    pub async fn submit(&self) -> Result<AttestationResult, SubmitError> {
        let (hash, wallet) = {
            let mut state = self.state();
            if state.phase.is_in_flight() {
                tracing::warn!("Submit ignored, a submission is already in progress");
                return Err(SubmitError::InFlight);
            }
            state.phase = Phase::Validating;
            (
                state.input.as_ref().map(|p| p.hash.clone()),
                state.wallet.clone(),
            )
        };

        let guard = InFlightGuard::arm(self);
        let started = Instant::now();
        let attempt_id = Uuid::new_v4();
        let span = tracing::info_span!("submission", attempt_id = %attempt_id);

        let result = self.run(hash, wallet).instrument(span).await;

        guard.settle(&result);
        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::record_submission(outcome, started.elapsed());

        match &result {
            Ok(attestation) => tracing::info!(
                attempt_id = %attempt_id,
                uid = %attestation.uid,
                tx_hash = %attestation.tx_hash,
                "Attestation submitted"
            ),
            Err(e) if e.is_precondition() => {
                tracing::warn!(attempt_id = %attempt_id, error = %e, "Submission rejected")
            }
            Err(e) => tracing::error!(attempt_id = %attempt_id, error = %e, "Submission failed"),
        }

        result
    }

    async fn run(
        &self,
        hash: Option<ContentHash>,
        wallet: Option<Arc<dyn WalletClient>>,
    ) -> Result<AttestationResult, SubmitError> {
        let hash = hash.ok_or_else(|| SubmitError::Precondition(NO_INPUT_MESSAGE.to_string()))?;
        let wallet = match wallet {
            Some(wallet) if wallet.is_connected() => wallet,
            _ => return Err(SubmitError::NoWallet),
        };

        self.set_phase(Phase::AwaitingSigner);
        let signer = acquire_signer(Some(&wallet), self.policy)
            .await
            .map_err(SubmitError::from_signer)?;
        tracing::debug!(
            account = %signer.address(),
            transport = signer.transport_kind(),
            "Signer acquired"
        );

        self.set_phase(Phase::Submitting);
        let signer: Arc<dyn TransactionSigner> = Arc::new(signer);
        let result = self.submitter.submit(Some(signer), &hash).await;

        if let Err(AttestError::Encoding(message)) = &result {
            // canonical values always fit bytes32
            tracing::error!(hash = %hash, error = %message, "Canonical value failed to encode");
        }
        result.map_err(SubmitError::from)
    }

    fn set_phase(&self, phase: Phase) {
        self.state().phase = phase;
    }
}

impl std::fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionController")
            .field("submitter", &self.submitter)
            .field("policy", &self.policy)
            .field("phase", &self.phase())
            .finish()
    }
}

/// Marks a submission in flight; on drop without a result, fails it as abandoned.
struct InFlightGuard<'a> {
    controller: &'a SubmissionController,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn arm(controller: &'a SubmissionController) -> Self {
        metrics::submission_started();
        Self {
            controller,
            armed: true,
        }
    }

    fn settle(mut self, result: &Result<AttestationResult, SubmitError>) {
        let phase = match result {
            Ok(attestation) => Phase::Succeeded(*attestation),
            Err(e) => Phase::Failed(e.clone()),
        };
        self.controller.set_phase(phase);
        self.armed = false;
        metrics::submission_finished();
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.controller
                .set_phase(Phase::Failed(SubmitError::Abandoned));
            metrics::submission_finished();
            metrics::record_submission("abandoned", std::time::Duration::ZERO);
            tracing::warn!("Submission abandoned before it completed");
        }
    }
}
