use bitcoin::Transaction;
use sha2::{Digest, Sha256};

/// One step of a merkle path: the sibling hash and which side it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerkleStep {
    pub sibling: [u8; 32],
    pub sibling_is_left: bool,
}

/// A merkle proof that embeds the transaction it proves inclusion for,
/// rather than referencing it by txid. Typically forwarded unsolicited by
/// whichever party first observes confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct MerkleProof {
    pub tx: Transaction,
    pub block_hash: [u8; 32],
    pub path: Vec<MerkleStep>,
}

impl MerkleProof {
    /// Recomputes the merkle root implied by `self.tx` and `self.path`,
    /// using double-SHA256 at each step (bitcoin's merkle tree hash).
    pub fn computed_root(&self) -> [u8; 32] {
        let mut hash = double_sha256(self.tx.compute_txid().as_ref());
        for step in &self.path {
            let mut buf = [0u8; 64];
            if step.sibling_is_left {
                buf[..32].copy_from_slice(&step.sibling);
                buf[32..].copy_from_slice(&hash);
            } else {
                buf[..32].copy_from_slice(&hash);
                buf[32..].copy_from_slice(&step.sibling);
            }
            hash = double_sha256(&buf);
        }
        hash
    }
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    second.into()
}

/// Miner acknowledgement of a transaction prior to confirmation, used by the
/// unconfirmed branch of [`AncestorTx`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerAck {
    pub miner_id: String,
    pub signature: Vec<u8>,
}

/// An ancestor transaction in an [`crate::expanded_tx::ExpandedTx`] bundle:
/// either unconfirmed (raw tx plus miner acknowledgements) or confirmed
/// (a merkle proof embedding the tx), matching the "closed under spends-from
/// up to a merkle proof" invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum AncestorTx {
    Unconfirmed { tx: Transaction, miner_acks: Vec<MinerAck> },
    Confirmed(MerkleProof),
}

impl AncestorTx {
    pub fn tx(&self) -> &Transaction {
        match self {
            AncestorTx::Unconfirmed { tx, .. } => tx,
            AncestorTx::Confirmed(proof) => &proof.tx,
        }
    }

    pub fn txid(&self) -> bitcoin::Txid {
        self.tx().compute_txid()
    }
}
