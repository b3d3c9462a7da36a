//! `RT` wrapper: where to send the response — either a peer-channel address
//! or a handle, never both.

use crate::envelope::Envelope;
use crate::script::ScriptItem;
use crate::sor::{FieldReader, FieldWriter, SorError, SorResult, SorValue};

use super::{parse_value, wrap_value, WrapperError, WrapperResult};

pub const PROTOCOL_ID: &str = "RT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyTo {
    PeerChannel { url: String, write_token: String },
    Handle(String),
}

impl SorValue for ReplyTo {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        let mut w = FieldWriter::new();
        match self {
            ReplyTo::PeerChannel { url, write_token } => {
                w.field(1, url);
                w.field(2, write_token);
            }
            ReplyTo::Handle(handle) => {
                w.field(3, handle);
            }
        }
        out.extend(w.finish());
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let (mut r, consumed) = FieldReader::parse(items)?;
        let url: Option<String> = r.take(1)?;
        let write_token: Option<String> = r.take(2)?;
        let handle: Option<String> = r.take(3)?;

        let value = match (url, write_token, handle) {
            (Some(url), Some(write_token), None) => ReplyTo::PeerChannel { url, write_token },
            (None, None, Some(handle)) => ReplyTo::Handle(handle),
            _ => return Err(SorError::UnsupportedFieldKind(0)),
        };
        Ok((value, consumed))
    }
}

pub fn wrap(inner: Envelope, reply_to: &ReplyTo) -> Envelope {
    wrap_value(inner, PROTOCOL_ID, reply_to)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<ReplyTo>, Envelope)> {
    let (value, residual) = parse_value(envelope, PROTOCOL_ID)?;
    Ok((value, residual))
}

/// Validates the "exactly one of peer-channel / handle" invariant
/// independently of parsing, for callers constructing a `ReplyTo` by hand.
pub fn validate(reply_to: &ReplyTo) -> WrapperResult<()> {
    match reply_to {
        ReplyTo::PeerChannel { url, write_token } if !url.is_empty() && !write_token.is_empty() => Ok(()),
        ReplyTo::Handle(h) if !h.is_empty() => Ok(()),
        _ => Err(WrapperError::InvalidReplyTo),
    }
}
