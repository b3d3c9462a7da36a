//! `EXP` wrapper: a Unix-seconds timestamp after which the message should be
//! considered stale.

use crate::envelope::Envelope;

use super::{parse_value, wrap_value, WrapperResult};

pub const PROTOCOL_ID: &str = "EXP";

pub type Expiry = u64;

pub fn wrap(inner: Envelope, expires_at: Expiry) -> Envelope {
    wrap_value(inner, PROTOCOL_ID, &expires_at)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<Expiry>, Envelope)> {
    parse_value(envelope, PROTOCOL_ID)
}
