/// Errors raised while framing or parsing an envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("not an envelope: missing OP_FALSE OP_RETURN protocol magic")]
    NotEnvelope,

    #[error("unsupported envelope version {0}")]
    UnsupportedVersion(u8),

    #[error(transparent)]
    Script(#[from] crate::script::ScriptError),

    #[error("protocol-id push data could not be decoded as a string")]
    InvalidProtocolId,
}

pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
