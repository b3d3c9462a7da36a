//! `FEES` wrapper: a fee quote, a list of `(fee_type, sat_numerator,
//! byte_denominator)` tuples.

use crate::envelope::Envelope;
use crate::sor::{FieldReader, FieldWriter, SorRecord, SorResult};

use super::{parse_value, wrap_value, WrapperResult};

pub const PROTOCOL_ID: &str = "FEES";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSpec {
    pub fee_type: u32,
    pub sat_numerator: u64,
    pub byte_denominator: u64,
}

impl SorRecord for FeeSpec {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.fee_type);
        w.field(2, &self.sat_numerator);
        w.field(3, &self.byte_denominator);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(FeeSpec {
            fee_type: r.require(1)?,
            sat_numerator: r.require(2)?,
            byte_denominator: r.require(3)?,
        })
    }
}

pub type FeeRequirements = Vec<FeeSpec>;

pub fn wrap(inner: Envelope, fees: &FeeRequirements) -> Envelope {
    wrap_value(inner, PROTOCOL_ID, fees)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<FeeRequirements>, Envelope)> {
    parse_value(envelope, PROTOCOL_ID)
}
