/// Errors raised by the signing layer.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("signature carried no public key and no base public key was supplied")]
    PublicKeyMissing,

    #[error("signature has no transient hash (it was never parsed from a residual envelope)")]
    HashMissing,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error(transparent)]
    Secp256k1(#[from] bitcoin::secp256k1::Error),

    #[error(transparent)]
    Envelope(#[from] crate::envelope::EnvelopeError),

    #[error(transparent)]
    Sor(#[from] crate::sor::SorError),

    #[error("outermost layer is not a signature (protocol-id \"S\")")]
    NotSigned,
}

pub type SigningResult<T> = Result<T, SigningError>;
