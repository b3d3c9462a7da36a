//! Script primitives: push-data / number / opcode items, var-int reader/writer.
//!
//! These are the smallest units of the wire format. An [`ScriptItem`] is either
//! a small fixed opcode or a length-prefixed push of raw bytes. Everything else
//! in this crate (the SOR codec, the envelope framer, the wrapper layers) is
//! built out of sequences of these items.

mod item;
mod number;
mod varint;

pub use item::{
    read_script_item, write_push_data, write_script_item, Opcode, ScriptItem, OP_16, OP_1,
    OP_1NEGATE, OP_FALSE, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4, OP_RESERVED, OP_RETURN,
};
pub use number::{push_number, push_number_unsigned, script_number_value, script_number_value_unsigned};
pub use varint::{read_var_int, write_var_int};

use std::fmt;

/// Errors raised while reading or writing script items.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("truncated script: expected {expected} more byte(s)")]
    Truncated { expected: usize },

    #[error("non-minimal number encoding")]
    NotMinimalNumber,

    #[error("item is not a number")]
    NotANumber,

    #[error("number {0} out of range for this opcode")]
    NumberOutOfRange(i64),

    #[error("unexpected negative number where an unsigned value was required")]
    UnexpectedNegative,

    #[error("var-int is not minimally encoded")]
    NonMinimalVarInt,
}

pub type ScriptResult<T> = Result<T, ScriptError>;

impl fmt::Display for ScriptItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptItem::Op(op) => write!(f, "OP_{:#04x}", op.0),
            ScriptItem::PushData(bytes) => write!(f, "PUSH({})", hex::encode(bytes)),
        }
    }
}
