//! `SID` wrapper: a string-form thread id, carried as raw bytes.

use crate::envelope::Envelope;

use super::{parse_value, wrap_value, WrapperResult};

pub const PROTOCOL_ID: &str = "SID";

pub type StringId = Vec<u8>;

pub fn wrap(inner: Envelope, id: &StringId) -> Envelope {
    wrap_value(inner, PROTOCOL_ID, id)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<StringId>, Envelope)> {
    parse_value(envelope, PROTOCOL_ID)
}
