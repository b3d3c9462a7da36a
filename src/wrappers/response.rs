//! `RE` wrapper: correlates a message to a prior request, carrying a status,
//! the protocol-id that owns the refining `code`, the `code` itself, and an
//! optional free-form note.

use crate::envelope::Envelope;
use crate::sor::{FieldReader, FieldWriter, SorError, SorRecord, SorResult};

use super::{parse_value, wrap_value, WrapperResult};

pub const PROTOCOL_ID: &str = "RE";

/// The outcome a `Response` reports for the request it correlates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    Reject,
    Invalid,
    Unauthorized,
    UnsupportedProtocol,
    Unwanted,
    NeedPayment,
    ChannelInUse,
    SystemIssue,
}

impl ResponseStatus {
    fn to_u32(self) -> u32 {
        match self {
            ResponseStatus::Ok => 0,
            ResponseStatus::Reject => 1,
            ResponseStatus::Invalid => 2,
            ResponseStatus::Unauthorized => 3,
            ResponseStatus::UnsupportedProtocol => 4,
            ResponseStatus::Unwanted => 5,
            ResponseStatus::NeedPayment => 6,
            ResponseStatus::ChannelInUse => 7,
            ResponseStatus::SystemIssue => 8,
        }
    }

    fn from_u32(value: u32) -> Result<Self, super::WrapperError> {
        Ok(match value {
            0 => ResponseStatus::Ok,
            1 => ResponseStatus::Reject,
            2 => ResponseStatus::Invalid,
            3 => ResponseStatus::Unauthorized,
            4 => ResponseStatus::UnsupportedProtocol,
            5 => ResponseStatus::Unwanted,
            6 => ResponseStatus::NeedPayment,
            7 => ResponseStatus::ChannelInUse,
            8 => ResponseStatus::SystemIssue,
            other => return Err(super::WrapperError::UnknownStatus(other)),
        })
    }
}

impl crate::sor::SorValue for ResponseStatus {
    fn marshal(&self, out: &mut Vec<crate::script::ScriptItem>) {
        self.to_u32().marshal(out)
    }

    fn unmarshal(items: &[crate::script::ScriptItem]) -> SorResult<(Self, usize)> {
        let (raw, consumed) = u32::unmarshal(items)?;
        let status = ResponseStatus::from_u32(raw).map_err(|_| SorError::UnsupportedFieldKind(0))?;
        Ok((status, consumed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: ResponseStatus,
    pub code_protocol_id: String,
    pub code: u32,
    pub note: Option<String>,
}

impl SorRecord for Response {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.status);
        w.field(2, &self.code_protocol_id);
        w.field(3, &self.code);
        w.optional_field(4, &self.note);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(Response {
            status: r.require(1)?,
            code_protocol_id: r.require(2)?,
            code: r.require(3)?,
            note: r.take(4)?,
        })
    }
}

pub fn wrap(inner: Envelope, response: &Response) -> Envelope {
    wrap_value(inner, PROTOCOL_ID, response)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<Response>, Envelope)> {
    parse_value(envelope, PROTOCOL_ID)
}
