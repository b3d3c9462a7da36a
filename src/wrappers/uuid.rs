//! `UUID` wrapper: a 16-byte thread/request id.

use crate::envelope::Envelope;

use super::{parse_value, wrap_value, WrapperResult};

pub const PROTOCOL_ID: &str = "UUID";

pub type Uuid = [u8; 16];

pub fn wrap(inner: Envelope, uuid: &Uuid) -> Envelope {
    wrap_value(inner, PROTOCOL_ID, uuid)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<Uuid>, Envelope)> {
    parse_value(envelope, PROTOCOL_ID)
}
