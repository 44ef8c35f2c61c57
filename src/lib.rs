//! Content-hash attestations on the Ethereum Attestation Service.
//!
//! A URL or hex token is canonicalized to a bytes32 value and attested
//! under a fixed schema through whichever wallet is connected.

pub mod attestation;
pub mod blockchain;
pub mod canonical;
pub mod config;
pub mod observability;
pub mod social;
pub mod submission;
pub mod wallet;

pub use canonical::{canonicalize, ContentHash, InputMode, ProcessedInput};
pub use config::AppConfig;
pub use submission::{SubmissionController, SubmitError};
