//! `MP` body: a merkle proof embedding its transaction. Typically forwarded
//! unsolicited by whichever party first observes confirmation.

use crate::envelope::Envelope;
use crate::expanded_tx::{MerkleProof, MerkleStep};
use crate::sor::{FieldReader, FieldWriter, SorError, SorRecord, SorResult};

use super::{read_header, wrap_body, BodyError, BodyResult};

pub const PROTOCOL_ID: &str = "MP";
const TYPE_MERKLE_PROOF: u8 = 0;

impl SorRecord for MerkleStep {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.sibling);
        w.field(2, &self.sibling_is_left);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(MerkleStep { sibling: r.require(1)?, sibling_is_left: r.require(2)? })
    }
}

impl SorRecord for MerkleProof {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        let tx_bytes = bitcoin::consensus::serialize(&self.tx);
        w.field(1, &tx_bytes);
        w.field(2, &self.block_hash);
        w.field(3, &self.path);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        let tx_bytes: Vec<u8> = r.require(1)?;
        let tx = bitcoin::consensus::deserialize(&tx_bytes).map_err(|_| SorError::UnsupportedFieldKind(1))?;
        Ok(MerkleProof { tx, block_hash: r.require(2)?, path: r.require(3)? })
    }
}

pub fn wrap(proof: &MerkleProof) -> Envelope {
    wrap_body(PROTOCOL_ID, TYPE_MERKLE_PROOF, proof)
}

pub fn parse(envelope: Envelope) -> BodyResult<(Option<MerkleProof>, Envelope)> {
    let Some((_version, message_type)) = read_header(&envelope, PROTOCOL_ID)? else {
        return Ok((None, envelope));
    };
    if message_type != TYPE_MERKLE_PROOF {
        return Err(BodyError::UnknownMessageType(message_type, PROTOCOL_ID));
    }
    let (proof, residual) = super::parse_record::<MerkleProof>(envelope)?;
    Ok((Some(proof), residual))
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
    use bitcoin::absolute::LockTime;
    use bitcoin::transaction::Version;
    use bitcoin::Transaction;

    #[test]
    fn round_trips_through_sor() {
        let tx = Transaction { version: Version::TWO, lock_time: LockTime::ZERO, input: vec![], output: vec![] };
        let proof = MerkleProof {
            tx,
            block_hash: [7; 32],
            path: vec![MerkleStep { sibling: [1; 32], sibling_is_left: true }],
        };
        let envelope = wrap(&proof);
        let (decoded, _) = parse(envelope).unwrap();
        assert_eq!(decoded, Some(proof));
    }
}
