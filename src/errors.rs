//! Crate-wide error taxonomy: each component owns its own error enum
//! (`ScriptError`, `SorError`, `EnvelopeError`, `SigningError`,
//! `WrapperError`, `BodyError`, `RegistryError`, `ExpandedTxError`);
//! `ChannelsError` composes them the way a caller driving the whole stack
//! end to end typically wants to handle a single `Result`.

use thiserror::Error;

/// Crate-wide error type composing every component's own error enum.
#[derive(Error, Debug)]
pub enum ChannelsError {
    #[error(transparent)]
    Script(#[from] crate::script::ScriptError),

    #[error(transparent)]
    Sor(#[from] crate::sor::SorError),

    #[error(transparent)]
    Envelope(#[from] crate::envelope::EnvelopeError),

    #[error(transparent)]
    Signing(#[from] crate::signing::SigningError),

    #[error(transparent)]
    Wrapper(#[from] crate::wrappers::WrapperError),

    #[error(transparent)]
    Body(#[from] crate::bodies::BodyError),

    #[error(transparent)]
    Registry(#[from] crate::registry::RegistryError),

    #[error(transparent)]
    ExpandedTx(#[from] crate::expanded_tx::ExpandedTxError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ChannelsResult<T> = Result<T, ChannelsError>;

impl From<config::ConfigError> for ChannelsError {
    fn from(err: config::ConfigError) -> Self {
        ChannelsError::Config(err.to_string())
    }
}
