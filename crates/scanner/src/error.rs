use thiserror::Error;

/// Abnormal termination of the check pipeline.
///
/// Either variant sends the scan into the fatal path: `status=Failed`,
/// `error` set, and a Critical fatal finding appended on top of the
/// findings gathered so far.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Escaneo cancelado por el host")]
    Cancelled,

    #[error("Error interno: {0}")]
    Internal(String),
}
