use thiserror::Error;

/// Errors surfaced by the proof engine.
///
/// A failed verification is not an error: [`crate::Proof::response_verify`]
/// reports it by returning `false`.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying stream failed or ended early.
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),
    /// Bytes read from a stream were not a canonical element encoding.
    #[error("malformed {0} element")]
    InvalidElement(&'static str),
    /// A secret-side operation was attempted on a verifier instance.
    #[error("operation requires a prover instance")]
    ProverOnly,
    /// The instance was not created from this proof description.
    #[error("instance does not match the proof description")]
    DescriptionMismatch,
    /// A supplement slot does not belong to this proof description.
    #[error("supplement slot does not belong to this proof")]
    UnknownSupplement,
}
