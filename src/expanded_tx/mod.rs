//! Ancestor transactions and the expanded-tx fee model.
//!
//! An [`ExpandedTx`] pairs a transaction with enough ancestry to resolve
//! every spent input's value without an external UTXO lookup, either
//! directly via `spent_outputs` or transitively through `ancestors`.

mod ancestor;
mod error;
#[allow(clippy::module_inception)]
mod expanded_tx;

pub use ancestor::{AncestorTx, MerkleProof, MerkleStep, MinerAck};
pub use error::{ExpandedTxError, ExpandedTxResult};
pub use expanded_tx::ExpandedTx;
