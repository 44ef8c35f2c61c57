//! End-to-end submission through the controller, signer adapter and EAS client.

mod common;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::TxKind;
use tokio::sync::Notify;

use cast_attest::canonical::InputMode;
use cast_attest::submission::{Phase, SubmissionController, SubmitError};
use cast_attest::wallet::WalletClient;

use common::{expected_uid, fast_policy, settings, MockWallet, SendBehavior, ACCOUNT, CONTRACT, SCHEMA_UID};

fn controller_with(wallet: Arc<MockWallet>) -> SubmissionController {
    SubmissionController::new(
        settings(),
        fast_policy(),
        Some(wallet as Arc<dyn WalletClient>),
    )
}

async fn wait_for_phase(controller: &SubmissionController, phase: Phase) {
    for _ in 0..200 {
        if controller.phase() == phase {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("controller never reached {:?}", phase);
}

#[tokio::test]
async fn test_url_attestation_end_to_end() {
    let wallet = Arc::new(MockWallet::new(SendBehavior::Mine));
    let controller = controller_with(wallet.clone());

    let processed = controller
        .set_input(InputMode::Url, "https://farcaster.xyz/sandusky/0x78e0db62")
        .unwrap()
        .unwrap();

    let result = controller.submit().await.unwrap();
    assert_eq!(result.uid, expected_uid(0));
    assert_eq!(controller.phase(), Phase::Succeeded(result));

    let sent = wallet.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, Some(TxKind::Call(CONTRACT)));
    assert_eq!(sent[0].from, Some(ACCOUNT));

    let attested = wallet.attested();
    assert_eq!(attested[0].0, SCHEMA_UID);
    assert_eq!(
        attested[0].1.as_ref(),
        processed.hash.to_b256().unwrap().as_slice()
    );

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, "succeeded");
    assert_eq!(snapshot.result, Some(result));
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_hex_attestation_encodes_padded_value() {
    let wallet = Arc::new(MockWallet::new(SendBehavior::Mine));
    let controller = controller_with(wallet.clone());

    controller.set_input(InputMode::Hex, "0x1234").unwrap();
    controller.submit().await.unwrap();

    let data = &wallet.attested()[0].1;
    assert_eq!(data.len(), 32);
    assert_eq!(&data[..2], &[0x12, 0x34]);
    assert!(data[2..].iter().all(|b| *b == 0));
}

#[tokio::test]
async fn test_no_wallet_never_touches_network() {
    let wallet = Arc::new(MockWallet::disconnected());
    let controller = controller_with(wallet.clone());
    controller.set_input(InputMode::Hex, "0x1234").unwrap();

    let err = controller.submit().await.unwrap_err();
    assert_eq!(err, SubmitError::NoWallet);
    assert!(wallet.methods().is_empty());
    assert_eq!(controller.phase(), Phase::Failed(SubmitError::NoWallet));
}

#[tokio::test]
async fn test_invalid_input_blocks_submit() {
    let wallet = Arc::new(MockWallet::new(SendBehavior::Mine));
    let controller = controller_with(wallet.clone());

    assert!(controller
        .set_input(InputMode::Url, "https://example.com/")
        .is_err());
    let err = controller.submit().await.unwrap_err();
    assert!(matches!(err, SubmitError::Precondition(_)));
    assert!(wallet.methods().is_empty());
}

#[tokio::test]
async fn test_repeat_submission_creates_new_attestation() {
    let wallet = Arc::new(MockWallet::new(SendBehavior::Mine));
    let controller = controller_with(wallet.clone());
    controller.set_input(InputMode::Hex, "0xabcdef").unwrap();

    let first = controller.submit().await.unwrap();
    let second = controller.submit().await.unwrap();

    assert_ne!(first.uid, second.uid);
    assert_ne!(first.tx_hash, second.tx_hash);
    let attested = wallet.attested();
    assert_eq!(attested.len(), 2);
    assert_eq!(attested[0], attested[1]);
}

#[tokio::test]
async fn test_rejected_in_wallet() {
    let wallet = Arc::new(MockWallet::new(SendBehavior::Reject));
    let controller = controller_with(wallet.clone());
    controller.set_input(InputMode::Hex, "0x1234").unwrap();

    let err = controller.submit().await.unwrap_err();
    assert_eq!(err.kind(), "transaction");
    assert!(err.user_message().contains("User rejected the request."));
    assert!(wallet.attested().is_empty());
}

#[tokio::test]
async fn test_reverted_transaction_fails() {
    let wallet = Arc::new(MockWallet::new(SendBehavior::Revert));
    let controller = controller_with(wallet.clone());
    controller.set_input(InputMode::Hex, "0x1234").unwrap();

    let err = controller.submit().await.unwrap_err();
    assert_eq!(err.kind(), "transaction");
    assert!(err.user_message().contains("reverted"));
    assert!(matches!(controller.phase(), Phase::Failed(_)));
}

#[tokio::test]
async fn test_recovers_after_failure() {
    let controller = controller_with(Arc::new(MockWallet::new(SendBehavior::Revert)));
    controller.set_input(InputMode::Hex, "0x1234").unwrap();
    assert!(controller.submit().await.is_err());

    controller.set_wallet(Some(Arc::new(MockWallet::new(SendBehavior::Mine))));
    let result = controller.submit().await.unwrap();
    assert_eq!(controller.phase(), Phase::Succeeded(result));
}

#[tokio::test]
async fn test_second_submit_rejected_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let wallet = Arc::new(MockWallet::gated(gate.clone()));
    let controller = Arc::new(controller_with(wallet.clone()));
    controller.set_input(InputMode::Hex, "0x1234").unwrap();

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit().await })
    };
    wait_for_phase(&controller, Phase::AwaitingSigner).await;

    assert_eq!(controller.submit().await.unwrap_err(), SubmitError::InFlight);
    assert_eq!(controller.phase(), Phase::AwaitingSigner);

    // input edits mid-flight do not change the pending hash
    controller.set_input(InputMode::Hex, "0xffff").unwrap();

    gate.notify_one();
    let result = pending.await.unwrap().unwrap();
    assert_eq!(controller.phase(), Phase::Succeeded(result));

    let attested = wallet.attested();
    assert_eq!(attested.len(), 1);
    assert_eq!(&attested[0].1[..2], &[0x12, 0x34]);
}

#[tokio::test]
async fn test_abandoned_submission_settles() {
    let gate = Arc::new(Notify::new());
    let controller = controller_with(Arc::new(MockWallet::gated(gate)));
    controller.set_input(InputMode::Hex, "0x1234").unwrap();

    let waited = tokio::time::timeout(Duration::from_millis(50), controller.submit()).await;
    assert!(waited.is_err());
    assert_eq!(controller.phase(), Phase::Failed(SubmitError::Abandoned));

    controller.set_wallet(Some(Arc::new(MockWallet::new(SendBehavior::Mine))));
    assert!(controller.submit().await.is_ok());
}
