//! The envelope framer: wraps a `(protocol_ids, payload)` tuple into a
//! single `OP_FALSE OP_RETURN`-prefixed byte stream, and parses it back.
//!
//! Protocol ids are a list, not a single value. A wrapper layer "wraps" an
//! inner envelope by prepending its own protocol-id to the id list and its
//! own script items to the front of the payload; a decoder peels layers by
//! comparing the leading protocol-id, without needing to re-parse the outer
//! frame on every peel.

mod error;

pub use error::{EnvelopeError, EnvelopeResult};

use std::io::Read;

use crate::script::{
    push_number_unsigned, read_script_item, script_number_value_unsigned, write_script_item,
    ScriptItem, OP_FALSE, OP_RETURN,
};

/// The two-byte protocol magic that follows `OP_FALSE OP_RETURN`.
pub const PROTOCOL_MAGIC: [u8; 2] = [0xbd, 0x01];

/// Current envelope framing version.
pub const ENVELOPE_VERSION: u8 = 0;

/// `(ProtocolIDs, Payload)`: an ordered sequence of short protocol-id byte
/// strings and an ordered sequence of script items.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    pub protocol_ids: Vec<String>,
    pub payload: Vec<ScriptItem>,
}

impl Envelope {
    pub fn new(protocol_id: impl Into<String>, payload: Vec<ScriptItem>) -> Self {
        Envelope {
            protocol_ids: vec![protocol_id.into()],
            payload,
        }
    }

    /// Wraps `self` with a new outermost layer: `protocol_id` is prepended to
    /// the id list and `items` is prepended to the payload.
    pub fn wrap(mut self, protocol_id: impl Into<String>, items: Vec<ScriptItem>) -> Self {
        let mut new_payload = items;
        new_payload.append(&mut self.payload);
        self.payload = new_payload;

        let mut new_ids = vec![protocol_id.into()];
        new_ids.append(&mut self.protocol_ids);
        self.protocol_ids = new_ids;
        self
    }

    /// The outermost protocol-id, if any layer remains.
    pub fn leading_protocol_id(&self) -> Option<&str> {
        self.protocol_ids.first().map(|s| s.as_str())
    }

    /// Strips the outermost protocol-id and the first `item_count` payload
    /// items, returning the residual envelope. Used by a wrapper's `parse`
    /// once it has determined how many items it owns.
    pub fn strip(mut self, item_count: usize) -> Envelope {
        if !self.protocol_ids.is_empty() {
            self.protocol_ids.remove(0);
        }
        let remaining = if item_count <= self.payload.len() {
            self.payload.split_off(item_count)
        } else {
            Vec::new()
        };
        self.payload = remaining;
        self
    }

    /// Serializes `(OP_FALSE OP_RETURN, magic, version, ids, payload)`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(OP_FALSE.0);
        out.push(OP_RETURN.0);
        out.extend_from_slice(&PROTOCOL_MAGIC);
        write_script_item(&mut out, &push_number_unsigned(ENVELOPE_VERSION as u64))
            .expect("writing to a Vec<u8> never fails");

        write_script_item(&mut out, &push_number_unsigned(self.protocol_ids.len() as u64))
            .expect("writing to a Vec<u8> never fails");
        for id in &self.protocol_ids {
            write_script_item(&mut out, &ScriptItem::PushData(id.as_bytes().to_vec()))
                .expect("writing to a Vec<u8> never fails");
        }

        write_script_item(&mut out, &push_number_unsigned(self.payload.len() as u64))
            .expect("writing to a Vec<u8> never fails");
        for item in &self.payload {
            write_script_item(&mut out, item).expect("writing to a Vec<u8> never fails");
        }
        out
    }

    /// Parses an envelope from `bytes`. The sole gate is the presence of the
    /// leading `OP_FALSE OP_RETURN` and the protocol magic.
    pub fn parse(bytes: &[u8]) -> EnvelopeResult<Envelope> {
        if bytes.len() < 4
            || bytes[0] != OP_FALSE.0
            || bytes[1] != OP_RETURN.0
            || bytes[2..4] != PROTOCOL_MAGIC
        {
            return Err(EnvelopeError::NotEnvelope);
        }
        let mut cursor = &bytes[4..];

        let version_item = read_script_item(&mut cursor)?;
        let version = script_number_value_unsigned(&version_item)?;
        if version != ENVELOPE_VERSION as u64 {
            return Err(EnvelopeError::UnsupportedVersion(version as u8));
        }

        let id_count_item = read_script_item(&mut cursor)?;
        let id_count = script_number_value_unsigned(&id_count_item)?;
        let mut protocol_ids = Vec::with_capacity(id_count as usize);
        for _ in 0..id_count {
            let item = read_script_item(&mut cursor)?;
            let bytes = item.as_push_data().ok_or(EnvelopeError::InvalidProtocolId)?;
            let id = String::from_utf8(bytes.to_vec())
                .map_err(|_| EnvelopeError::InvalidProtocolId)?;
            protocol_ids.push(id);
        }

        let payload_count_item = read_script_item(&mut cursor)?;
        let payload_count = script_number_value_unsigned(&payload_count_item)?;
        let mut payload = Vec::with_capacity(payload_count as usize);
        for _ in 0..payload_count {
            payload.push(read_script_item(&mut cursor)?);
        }

        Ok(Envelope { protocol_ids, payload })
    }
}

/// Helper for wrappers/bodies that need to read directly from a payload slice
/// (e.g. to decode a fixed number of items without going through `SorValue`).
pub fn read_n_items<R: Read>(r: &mut R, n: usize) -> EnvelopeResult<Vec<ScriptItem>> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(read_script_item(r)?);
    }
    Ok(out)
}
