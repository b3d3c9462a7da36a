/// Errors raised while resolving input values or fees over an `ExpandedTx`.
#[derive(Debug, thiserror::Error)]
pub enum ExpandedTxError {
    #[error("no spent-output or ancestor transaction supplies the value of input {0}")]
    MissingInput(usize),

    #[error("calculated fee is negative: outputs exceed inputs by {0} satoshi(s)")]
    NegativeFee(u64),

    #[error("input index {0} is out of range for this transaction")]
    InputIndexOutOfRange(usize),
}

pub type ExpandedTxResult<T> = Result<T, ExpandedTxError>;
