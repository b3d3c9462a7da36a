/// Errors raised by the Script Object Representation codec.
#[derive(Debug, thiserror::Error)]
pub enum SorError {
    #[error("field tag {tag} is out of order (previous tag was {previous})")]
    TagOutOfOrder { tag: u64, previous: u64 },

    #[error("field tag {0} appears more than once")]
    DuplicateTag(u64),

    #[error("tag 0 is reserved and may not be used")]
    ReservedTag,

    #[error("unsupported field kind for tag {0}")]
    UnsupportedFieldKind(u64),

    #[error("value for tag {tag} was truncated: expected {expected} item(s), found {found}")]
    TruncatedValue {
        tag: u64,
        expected: usize,
        found: usize,
    },

    #[error("missing required field with tag {0}")]
    MissingField(u64),

    #[error(transparent)]
    Script(#[from] crate::script::ScriptError),
}

pub type SorResult<T> = Result<T, SorError>;
