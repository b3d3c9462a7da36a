//! `TxID` wrapper: attaches a 32-byte transaction id to a body.

use crate::envelope::Envelope;

use super::{parse_value, wrap_value, WrapperResult};

pub const PROTOCOL_ID: &str = "TxID";

pub type TxId = [u8; 32];

pub fn wrap(inner: Envelope, txid: &TxId) -> Envelope {
    wrap_value(inner, PROTOCOL_ID, txid)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<TxId>, Envelope)> {
    parse_value(envelope, PROTOCOL_ID)
}
