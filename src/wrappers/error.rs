/// Errors raised while wrapping or parsing a wrapper layer.
#[derive(Debug, thiserror::Error)]
pub enum WrapperError {
    #[error(transparent)]
    Sor(#[from] crate::sor::SorError),

    #[error(transparent)]
    Script(#[from] crate::script::ScriptError),

    #[error("unknown response status code {0}")]
    UnknownStatus(u32),

    #[error("ReplyTo must carry either a peer-channel address or a handle, not both or neither")]
    InvalidReplyTo,

    #[error("unsupported masked-input version {0}")]
    UnsupportedMaskedInputVersion(u8),
}

pub type WrapperResult<T> = Result<T, WrapperError>;
