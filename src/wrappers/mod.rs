//! Wrapper layers: protocol layers that each own a distinct protocol-id
//! and enclose another envelope. Every wrapper's payload is itself a
//! [`crate::sor::SorValue`] (a scalar, raw bytes, a fixed-size array, or a
//! tagged record), which lets [`wrap_value`]/[`parse_value`] below do the
//! envelope plumbing once instead of once per wrapper.
//!
//! A wrapper's `parse` returns `Ok(None)` if the leading protocol-id doesn't
//! match, leaving the envelope untouched — this is how the registry
//! peels layers in whatever order they were observed on the wire.

mod error;

pub mod expiry;
pub mod fees;
pub mod masked_input;
pub mod message_id;
pub mod note;
pub mod reply_to;
pub mod response;
pub mod string_id;
pub mod txid;
pub mod uuid;

pub use error::{WrapperError, WrapperResult};

use crate::envelope::Envelope;
use crate::sor::SorValue;

/// Wraps `inner` with a new outermost layer carrying `value`'s SOR encoding.
pub fn wrap_value<T: SorValue>(inner: Envelope, protocol_id: &str, value: &T) -> Envelope {
    let items = crate::sor::marshal(value);
    inner.wrap(protocol_id, items)
}

/// If `envelope`'s outermost protocol-id is `protocol_id`, decodes its
/// payload as `T`, returning `(Some(value), residual_envelope)`. If the id
/// doesn't match, returns `(None, envelope)` unchanged.
pub fn parse_value<T: SorValue>(
    envelope: Envelope,
    protocol_id: &str,
) -> WrapperResult<(Option<T>, Envelope)> {
    if envelope.leading_protocol_id() != Some(protocol_id) {
        return Ok((None, envelope));
    }
    let (value, consumed) = T::unmarshal(&envelope.payload)?;
    let residual = envelope.strip(consumed);
    Ok((Some(value), residual))
}

/// The ordered set of wrapper layers observed on a parsed message, in the
/// order they appeared on the wire (outermost first).
#[derive(Debug, Clone, PartialEq)]
pub enum Wrapper {
    Response(response::Response),
    ReplyTo(reply_to::ReplyTo),
    Uuid(uuid::Uuid),
    StringId(string_id::StringId),
    Note(note::Note),
    Expiry(expiry::Expiry),
    MessageId(message_id::MessageId),
    TxId(txid::TxId),
    Fees(fees::FeeRequirements),
    MaskedInput(masked_input::MaskedInput),
}

impl Wrapper {
    pub fn protocol_id(&self) -> &'static str {
        match self {
            Wrapper::Response(_) => response::PROTOCOL_ID,
            Wrapper::ReplyTo(_) => reply_to::PROTOCOL_ID,
            Wrapper::Uuid(_) => uuid::PROTOCOL_ID,
            Wrapper::StringId(_) => string_id::PROTOCOL_ID,
            Wrapper::Note(_) => note::PROTOCOL_ID,
            Wrapper::Expiry(_) => expiry::PROTOCOL_ID,
            Wrapper::MessageId(_) => message_id::PROTOCOL_ID,
            Wrapper::TxId(_) => txid::PROTOCOL_ID,
            Wrapper::Fees(_) => fees::PROTOCOL_ID,
            Wrapper::MaskedInput(_) => masked_input::PROTOCOL_ID,
        }
    }
}

/// Tries every known wrapper against the envelope's leading protocol-id,
/// returning the first match. Used by the registry to peel one layer
/// at a time without needing to know the wire order ahead of time.
pub fn try_parse_one(envelope: Envelope) -> WrapperResult<(Option<Wrapper>, Envelope)> {
    macro_rules! try_wrapper {
        ($envelope:expr, $variant:ident, $module:ident) => {{
            let (maybe, residual) = $module::parse($envelope)?;
            match maybe {
                Some(value) => return Ok((Some(Wrapper::$variant(value)), residual)),
                None => residual,
            }
        }};
    }
    let envelope = try_wrapper!(envelope, Response, response);
    let envelope = try_wrapper!(envelope, ReplyTo, reply_to);
    let envelope = try_wrapper!(envelope, Uuid, uuid);
    let envelope = try_wrapper!(envelope, StringId, string_id);
    let envelope = try_wrapper!(envelope, Note, note);
    let envelope = try_wrapper!(envelope, Expiry, expiry);
    let envelope = try_wrapper!(envelope, MessageId, message_id);
    let envelope = try_wrapper!(envelope, TxId, txid);
    let envelope = try_wrapper!(envelope, Fees, fees);
    let envelope = try_wrapper!(envelope, MaskedInput, masked_input);
    Ok((None, envelope))
}
