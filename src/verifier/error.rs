use thiserror::Error;

/// Batch-level failures. Per-address and per-check failures never surface
/// here; they are folded into the affected [`CheckResult`](super::CheckResult).
#[derive(Debug, Error)]
pub enum BatchError {
    /// The request carried no addresses to verify.
    #[error("no email addresses provided")]
    EmptyInput,
    /// A verification task died before producing a report. The whole batch
    /// is rejected rather than returning partial output.
    #[error("verification task failed: {0}")]
    Unexpected(String),
}
