//! `RJ` body: a standalone reject message, distinct from the `RE` response
//! wrapper — this is a terminal body in its own right, used when there is no
//! inner message to wrap (a bare rejection of an unparseable or unwanted
//! envelope).

use crate::envelope::Envelope;
use crate::sor::{FieldReader, FieldWriter, SorRecord, SorResult};
use crate::wrappers::response::ResponseStatus;

use super::{read_header, wrap_body, BodyError, BodyResult};

pub const PROTOCOL_ID: &str = "RJ";
const TYPE_REJECT: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reject {
    pub status: ResponseStatus,
    pub code_protocol_id: String,
    pub code: u32,
    pub note: Option<String>,
}

impl SorRecord for Reject {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.status);
        w.field(2, &self.code_protocol_id);
        w.field(3, &self.code);
        w.optional_field(4, &self.note);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(Reject {
            status: r.require(1)?,
            code_protocol_id: r.require(2)?,
            code: r.require(3)?,
            note: r.take(4)?,
        })
    }
}

pub fn wrap(reject: &Reject) -> Envelope {
    wrap_body(PROTOCOL_ID, TYPE_REJECT, reject)
}

pub fn parse(envelope: Envelope) -> BodyResult<(Option<Reject>, Envelope)> {
    let Some((_version, message_type)) = read_header(&envelope, PROTOCOL_ID)? else {
        return Ok((None, envelope));
    };
    if message_type != TYPE_REJECT {
        return Err(BodyError::UnknownMessageType(message_type, PROTOCOL_ID));
    }
    let (reject, residual) = super::parse_record::<Reject>(envelope)?;
    Ok((Some(reject), residual))
}

pub fn response_code_to_string(code: u32) -> &'static str {
    match code {
        0 => "ok",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_sor() {
        let reject = Reject {
            status: ResponseStatus::Unwanted,
            code_protocol_id: "I".to_string(),
            code: 3,
            note: None,
        };
        let envelope = wrap(&reject);
        let (decoded, _) = parse(envelope).unwrap();
        assert_eq!(decoded, Some(reject));
    }
}
