//! `ID` wrapper: a per-channel monotonic message id.

use crate::envelope::Envelope;

use super::{parse_value, wrap_value, WrapperResult};

pub const PROTOCOL_ID: &str = "ID";

pub type MessageId = u64;

pub fn wrap(inner: Envelope, id: MessageId) -> Envelope {
    wrap_value(inner, PROTOCOL_ID, &id)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<MessageId>, Envelope)> {
    parse_value(envelope, PROTOCOL_ID)
}
