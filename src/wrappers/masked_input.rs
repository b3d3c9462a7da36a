//! `UL` wrapper: masked inputs/outputs with zero outpoints and structured
//! unlocking-script data (open question in the design notes). Version 0
//! stores only `size, value`; version 1 adds `party`, defaulting to `1` when
//! absent on an older message.

use crate::envelope::Envelope;
use crate::script::{push_number_unsigned, script_number_value_unsigned};

use super::WrapperError;
use super::WrapperResult;

pub const PROTOCOL_ID: &str = "UL";
pub const CURRENT_VERSION: u8 = 1;
const DEFAULT_PARTY: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskedInput {
    pub size: u32,
    pub value: u64,
    pub party: u8,
}

pub fn wrap(inner: Envelope, masked: &MaskedInput) -> Envelope {
    wrap_with_version(inner, masked, CURRENT_VERSION)
}

/// Writes a specific wire version; mainly useful for tests exercising the
/// version-0 (no `party`) compatibility path.
pub fn wrap_with_version(inner: Envelope, masked: &MaskedInput, version: u8) -> Envelope {
    let mut items = vec![
        push_number_unsigned(version as u64),
        push_number_unsigned(masked.size as u64),
        push_number_unsigned(masked.value),
    ];
    if version >= 1 {
        items.push(push_number_unsigned(masked.party as u64));
    }
    inner.wrap(PROTOCOL_ID, items)
}

pub fn parse(envelope: Envelope) -> WrapperResult<(Option<MaskedInput>, Envelope)> {
    if envelope.leading_protocol_id() != Some(PROTOCOL_ID) {
        return Ok((None, envelope));
    }

    let version = script_number_value_unsigned(
        envelope.payload.first().ok_or(WrapperError::Sor(
            crate::sor::SorError::TruncatedValue { tag: 0, expected: 1, found: 0 },
        ))?,
    )? as u8;

    let (size, value, party, item_count) = match version {
        0 => {
            let size = script_number_value_unsigned(&envelope.payload[1])? as u32;
            let value = script_number_value_unsigned(&envelope.payload[2])?;
            (size, value, DEFAULT_PARTY, 3)
        }
        1 => {
            let size = script_number_value_unsigned(&envelope.payload[1])? as u32;
            let value = script_number_value_unsigned(&envelope.payload[2])?;
            let party = script_number_value_unsigned(&envelope.payload[3])? as u8;
            (size, value, party, 4)
        }
        other => return Err(WrapperError::UnsupportedMaskedInputVersion(other)),
    };

    let residual = envelope.strip(item_count);
    Ok((Some(MaskedInput { size, value, party }), residual))
}
