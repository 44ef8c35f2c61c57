//! On-chain attestation subsystem.
//!
//! # Data Flow
//! ```text
//! ContentHash
//!     → schema.rs    (SchemaEncoder: "bytes32 contentHash" → ABI bytes)
//!     → types.rs     (AttestationRequest: zero recipient, no expiry)
//!     → submitter.rs (Eas: attest(...) via TransactionSigner, Attested → UID)
//! ```

pub mod contract;
pub mod schema;
pub mod submitter;
pub mod types;

pub use schema::{AttestationSettings, SchemaDescriptor, SchemaEncoder, SchemaField};
pub use submitter::{attested_uid, AttestationSubmitter, Eas, CONTENT_HASH_FIELD};
pub use types::{AttestError, AttestResult, AttestationRequest, AttestationResult};
