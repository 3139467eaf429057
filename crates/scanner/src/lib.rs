//! Probe execution and scan orchestration.
//!
//! The single entry point is [`run_scan`] (or [`Scanner`] for reuse of
//! the HTTP client across scans): connectivity check → schema fetch →
//! DoS probes → BOLA probes, strictly sequential, with every outcome
//! funneled into the finding stream. The function never fails at the
//! boundary; all failures land in the result's `status` and `error`.

mod bola;
mod cancel;
mod dos;
mod error;
mod orchestrator;

pub use cancel::CancelToken;
pub use error::ScanError;
pub use orchestrator::{run_scan, Scanner};

use std::time::Duration;

/// Pause between consecutive probes, a light touch on the target.
pub(crate) const PROBE_PAUSE: Duration = Duration::from_millis(50);
