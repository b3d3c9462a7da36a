/// Errors raised while dispatching a wire message through a [`super::ProtocolRegistry`].
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Envelope(#[from] crate::envelope::EnvelopeError),

    #[error(transparent)]
    Signing(#[from] crate::signing::SigningError),

    #[error(transparent)]
    Wrapper(#[from] crate::wrappers::WrapperError),

    #[error(transparent)]
    Body(#[from] crate::bodies::BodyError),

    #[error("leading protocol id {0:?} is not recognised by this registry")]
    UnsupportedProtocol(String),

    #[error("a signature was present but no base public key was supplied to verify it")]
    UnverifiedSignature,
}

pub type RegistryResult<T> = Result<T, RegistryError>;
