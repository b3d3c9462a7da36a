//! `ETX` body: a transaction bundled with its ancestry, carried over the
//! wire so a recipient can compute fees and resolve input values without an
//! external UTXO lookup.

use bitcoin::{Amount, ScriptBuf, TxOut};

use crate::envelope::Envelope;
use crate::expanded_tx::{AncestorTx, ExpandedTx, MerkleProof, MinerAck};
use crate::script::ScriptItem;
use crate::sor::{FieldReader, FieldWriter, SorError, SorRecord, SorResult, SorValue};

use super::{read_header, wrap_body, BodyError, BodyResult};

pub const PROTOCOL_ID: &str = "ETX";
const TYPE_EXPANDED_TX: u8 = 0;

impl SorRecord for MinerAck {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.miner_id);
        w.field(2, &self.signature);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(MinerAck { miner_id: r.require(1)?, signature: r.require(2)? })
    }
}

impl SorValue for TxOut {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        let mut w = FieldWriter::new();
        w.field(1, &self.value.to_sat());
        w.field(2, &self.script_pubkey.to_bytes());
        out.extend(w.finish());
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let (mut r, consumed) = FieldReader::parse(items)?;
        let value: u64 = r.require(1)?;
        let script_bytes: Vec<u8> = r.require(2)?;
        Ok((TxOut { value: Amount::from_sat(value), script_pubkey: ScriptBuf::from_bytes(script_bytes) }, consumed))
    }
}

const ANCESTOR_TAG_UNCONFIRMED: u64 = 0;
const ANCESTOR_TAG_CONFIRMED: u64 = 1;

impl SorValue for AncestorTx {
    fn marshal(&self, out: &mut Vec<ScriptItem>) {
        let mut w = FieldWriter::new();
        match self {
            AncestorTx::Unconfirmed { tx, miner_acks } => {
                let tx_bytes = bitcoin::consensus::serialize(tx);
                w.field(1, &ANCESTOR_TAG_UNCONFIRMED);
                w.field(2, &tx_bytes);
                w.field(3, miner_acks);
            }
            AncestorTx::Confirmed(proof) => {
                w.field(1, &ANCESTOR_TAG_CONFIRMED);
                w.field(4, proof);
            }
        }
        out.extend(w.finish());
    }

    fn unmarshal(items: &[ScriptItem]) -> SorResult<(Self, usize)> {
        let (mut r, consumed) = FieldReader::parse(items)?;
        let tag: u64 = r.require(1)?;
        let value = match tag {
            ANCESTOR_TAG_UNCONFIRMED => {
                let tx_bytes: Vec<u8> = r.require(2)?;
                let tx = bitcoin::consensus::deserialize(&tx_bytes).map_err(|_| SorError::UnsupportedFieldKind(2))?;
                let miner_acks: Vec<MinerAck> = r.take(3)?.unwrap_or_default();
                AncestorTx::Unconfirmed { tx, miner_acks }
            }
            ANCESTOR_TAG_CONFIRMED => AncestorTx::Confirmed(r.require(4)?),
            other => return Err(SorError::UnsupportedFieldKind(other)),
        };
        Ok((value, consumed))
    }
}

impl SorRecord for ExpandedTx {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        let tx_bytes = bitcoin::consensus::serialize(&self.tx);
        w.field(1, &tx_bytes);
        w.field(2, &self.ancestors);
        let spent_outputs: Vec<Option<TxOut>> = self.spent_outputs.clone();
        w.field(3, &spent_outputs);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        let tx_bytes: Vec<u8> = r.require(1)?;
        let tx = bitcoin::consensus::deserialize(&tx_bytes).map_err(|_| SorError::UnsupportedFieldKind(1))?;
        let ancestors: Vec<AncestorTx> = r.require(2)?;
        let spent_outputs: Vec<Option<TxOut>> = r.require(3)?;
        Ok(ExpandedTx { tx, ancestors, spent_outputs })
    }
}

pub fn wrap(expanded: &ExpandedTx) -> Envelope {
    wrap_body(PROTOCOL_ID, TYPE_EXPANDED_TX, expanded)
}

pub fn parse(envelope: Envelope) -> BodyResult<(Option<ExpandedTx>, Envelope)> {
    let Some((_version, message_type)) = read_header(&envelope, PROTOCOL_ID)? else {
        return Ok((None, envelope));
    };
    if message_type != TYPE_EXPANDED_TX {
        return Err(BodyError::UnknownMessageType(message_type, PROTOCOL_ID));
    }
    let (expanded, residual) = super::parse_record::<ExpandedTx>(envelope)?;
    Ok((Some(expanded), residual))
}

pub fn response_code_to_string(code: u32) -> &'static str {
    match code {
        0 => "ok",
        1 => "missing_input",
        2 => "negative_fee",
        3 => "input_index_out_of_range",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::absolute::LockTime;
    use bitcoin::transaction::Version;
    use bitcoin::Transaction;

    fn sample_tx(value: u64) -> Transaction {
        Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![],
            output: vec![TxOut { value: Amount::from_sat(value), script_pubkey: ScriptBuf::new() }],
        }
    }

    #[test]
    fn round_trips_with_unconfirmed_ancestor() {
        let ancestor = sample_tx(50_000);
        let tx = sample_tx(40_000);
        let expanded = ExpandedTx::new(
            tx,
            vec![AncestorTx::Unconfirmed { tx: ancestor, miner_acks: vec![MinerAck { miner_id: "m1".into(), signature: vec![1, 2, 3] }] }],
        );
        let envelope = wrap(&expanded);
        let (decoded, _) = parse(envelope).unwrap();
        assert_eq!(decoded, Some(expanded));
    }

    #[test]
    fn round_trips_with_spent_outputs() {
        let tx = sample_tx(1_000);
        let mut expanded = ExpandedTx::new(tx, vec![]);
        expanded.spent_outputs = vec![];
        let envelope = wrap(&expanded);
        let (decoded, _) = parse(envelope).unwrap();
        assert_eq!(decoded, Some(expanded));
    }
}
