//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! canonical / wallet / attestation / submission produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (plain or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
