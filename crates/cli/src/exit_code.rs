//! Exit codes for the gqlguard CLI.

use gqlguard_types::{ScanResult, ScanStatus};

/// Exit codes used by the CLI.
///
/// `0` means the scan completed without Critical or High findings;
/// everything else (blocking findings, a failed scan, or a setup
/// error) is `1`, so CI gates need a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Scan completed with no Critical/High findings
    Success = 0,
    /// Blocking findings, failed scan, or setup error
    Failure = 1,
}

impl ExitCode {
    /// Derives the exit code from a sealed scan result.
    #[must_use]
    pub fn from_result(result: &ScanResult) -> Self {
        if result.status == ScanStatus::Failed || result.has_blocking_findings() {
            Self::Failure
        } else {
            Self::Success
        }
    }

    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}
