//! Foundation types for the gqlguard scanner.
//!
//! This crate defines the input contract ([`ScanTarget`], [`UserContext`]),
//! the output contract ([`ScanResult`], [`VulnerabilityFinding`]) and the
//! severity ordering shared by every prober. It holds no scanning logic.

mod finding;
mod result;
mod severity;
mod target;

pub use finding::{Evidence, VulnerabilityFinding};
pub use result::{ScanResult, ScanStatus};
pub use severity::Severity;
pub use target::{BolaConfig, ScanTarget, UserContext};
