//! Share-then-attest flow.
//!
//! A cast is composed through the host app's [`CastComposer`]; its hash,
//! when the host returns one, is fed to the controller in hex mode.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Prefix of the placeholder recorded when a published cast has no hash.
pub const NO_HASH_PREFIX: &str = "no hash";

/// Errors from the cast collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CastError {
    /// The host app failed to publish.
    #[error("Failed to share cast: {0}")]
    Compose(String),

    /// The cast was published but its hash is unknown.
    #[error("Cast was shared but no hash was returned")]
    NoHash,
}

/// Result type for cast operations.
pub type CastResult<T> = Result<T, CastError>;

/// A cast to publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastDraft {
    pub text: String,
    pub embeds: Vec<String>,
}

/// What the host app reports after a compose request.
#[derive(Debug, Clone, PartialEq)]
pub enum CastOutcome {
    /// Published; the payload is the host's raw response.
    Published(Value),
    /// Not published.
    Failed(String),
}

/// The host app's cast API.
#[async_trait]
pub trait CastComposer: Send + Sync {
    async fn compose_cast(&self, draft: CastDraft) -> CastOutcome;

    /// Open a published cast in the host app.
    async fn view_cast(&self, hash: &str, close: bool);
}

/// A published cast.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedCast {
    /// Cast hash, or a `"no hash _<millis>"` placeholder.
    pub hash: String,
    /// Raw host response, kept for display.
    pub response: Value,
}

impl SharedCast {
    fn from_response(response: Value) -> Self {
        let hash = response
            .pointer("/cast/hash")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!("{} _{}", NO_HASH_PREFIX, Utc::now().timestamp_millis())
            });
        Self { hash, response }
    }

    /// The hash, if it can be attested.
    pub fn attestable_hash(&self) -> CastResult<&str> {
        if self.hash.starts_with(NO_HASH_PREFIX) {
            Err(CastError::NoHash)
        } else {
            Ok(&self.hash)
        }
    }

    /// Open this cast in the host app. No-op without a usable hash.
    pub async fn view(&self, composer: &dyn CastComposer) {
        if let Ok(hash) = self.attestable_hash() {
            composer.view_cast(hash, false).await;
        }
    }
}

/// The greeting draft, stamped with the current UTC time.
pub fn hello_world_draft(embed_url: &str) -> CastDraft {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    CastDraft {
        text: format!("Hello World! 🌍 Posted at {}", timestamp),
        embeds: vec![embed_url.to_string()],
    }
}

/// Publish the greeting cast and report what came back.
pub async fn share_hello_world(
    composer: &dyn CastComposer,
    embed_url: &str,
) -> CastResult<SharedCast> {
    let draft = hello_world_draft(embed_url);
    tracing::debug!(text = %draft.text, "Composing cast");

    match composer.compose_cast(draft).await {
        CastOutcome::Published(response) => {
            let shared = SharedCast::from_response(response);
            tracing::info!(hash = %shared.hash, "Cast shared");
            Ok(shared)
        }
        CastOutcome::Failed(cause) => {
            tracing::warn!(error = %cause, "Error sharing cast");
            Err(CastError::Compose(cause))
        }
    }
}
