//! Submission state machine.
//!
//! ```text
//! Idle → Processing → Validating → AwaitingSigner → Submitting → Succeeded | Failed
//! ```
//!
//! A failure at any step lands in `Failed`; a new submit is accepted from
//! any phase that is not in flight.

pub mod controller;
pub mod state;

pub use controller::{SubmissionController, NO_INPUT_MESSAGE};
pub use state::{ControllerSnapshot, Phase, SubmitError};
