//! `NOTE` wrapper: a free-form human-readable string, carried as raw bytes.

use crate::envelope::Envelope;

use super::{parse_value, wrap_value, WrapperResult};

pub const PROTOCOL_ID: &str = "NOTE";

pub type Note = Vec<u8>;

pub fn wrap(inner: Envelope, note: &Note) -> Envelope {
    wrap_value(inner, PROTOCOL_ID, note)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<Note>, Envelope)> {
    parse_value(envelope, PROTOCOL_ID)
}
