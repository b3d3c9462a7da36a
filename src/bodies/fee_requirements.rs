//! `FeeRequirementsMessage`: a fee quote sent as the terminal body of a
//! message, rather than as a wrapper around some other body. This reuses
//! the `FEES` wrapper's protocol-id and payload shape (`wrappers::fees`)
//! instead of minting a second one — the wire-compatibility table lists
//! `"FEES"` exactly once, so a standalone fee quote is the `FEES` wrapper
//! enclosing an empty terminus envelope tagged `"FEES-END"`. A `FEES` layer
//! is read as this body only when it terminates there; otherwise it's an
//! ordinary wrapper around whatever body follows. `ProtocolRegistry::unwrap`
//! tells the two apart by trying a body match before a wrapper match at
//! each peeling step, so this `parse` gets first look at a `FEES` layer.

use crate::envelope::Envelope;
use crate::wrappers::fees::{self, FeeRequirements};

use super::BodyResult;

/// Shares the wrapper's own protocol-id; see the module doc for how the two
/// uses of `FEES` are told apart.
pub const PROTOCOL_ID: &str = fees::PROTOCOL_ID;

/// An empty inner protocol-id used purely as the terminus for a standalone
/// fee quote; it carries no payload of its own.
const TERMINAL_PROTOCOL_ID: &str = "FEES-END";

pub fn wrap(fees: &FeeRequirements) -> Envelope {
    let terminus = Envelope::new(TERMINAL_PROTOCOL_ID, vec![]);
    fees::wrap(terminus, fees)
}

/// Recognises a standalone fee quote: a `FEES` wrapper enclosing the
/// terminal marker and nothing else. Returns `(None, envelope)` unchanged,
/// leaving the envelope intact, if the leading id isn't `FEES`, or if it is
/// but the `FEES` layer encloses something other than the terminal marker
/// (the ordinary wrapper case) — that hands the envelope back for the
/// registry's normal wrapper peeling.
pub fn parse(envelope: Envelope) -> BodyResult<(Option<FeeRequirements>, Envelope)> {
    if envelope.leading_protocol_id() != Some(fees::PROTOCOL_ID) {
        return Ok((None, envelope));
    }
    let (value, residual) = fees::parse(envelope.clone())?;
    match value {
        Some(fee_requirements) if residual.leading_protocol_id() == Some(TERMINAL_PROTOCOL_ID) => {
            Ok((Some(fee_requirements), residual.strip(0)))
        }
        _ => Ok((None, envelope)),
    }
}

pub fn response_code_to_string(code: u32) -> &'static str {
    match code {
        0 => "ok",
        _ => "unknown",
    }
}
