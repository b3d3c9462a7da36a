//! Property 7: `calculate_fee == sum(inputs) - sum(outputs)`, `NegativeFee`
//! iff outputs exceed inputs, through the public `ExpandedTx` API.

use bitcoin::absolute::LockTime;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use channels_core::expanded_tx::{AncestorTx, ExpandedTx, ExpandedTxError};

fn parent_tx(value: u64) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: vec![],
        output: vec![TxOut { value: Amount::from_sat(value), script_pubkey: ScriptBuf::new() }],
    }
}

fn spending_tx(prev_txid: Txid, vout: u32, output_value: u64) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint { txid: prev_txid, vout },
            script_sig: ScriptBuf::new(),
            sequence: Sequence::MAX,
            witness: Witness::new(),
        }],
        output: vec![TxOut { value: Amount::from_sat(output_value), script_pubkey: ScriptBuf::new() }],
    }
}

#[test]
fn fee_is_exactly_inputs_minus_outputs_via_ancestor_lookup() {
    let parent = parent_tx(50_000);
    let parent_txid = parent.compute_txid();
    let child = spending_tx(parent_txid, 0, 48_000);

    let expanded = ExpandedTx::new(child, vec![AncestorTx::Unconfirmed { tx: parent, miner_acks: vec![] }]);
    assert_eq!(expanded.calculate_fee().unwrap(), Amount::from_sat(2_000));
}

#[test]
fn negative_fee_when_outputs_exceed_inputs() {
    let parent = parent_tx(1_000);
    let parent_txid = parent.compute_txid();
    let child = spending_tx(parent_txid, 0, 5_000);

    let expanded = ExpandedTx::new(child, vec![AncestorTx::Unconfirmed { tx: parent, miner_acks: vec![] }]);
    assert!(matches!(expanded.calculate_fee(), Err(ExpandedTxError::NegativeFee(_))));
}

#[test]
fn missing_input_when_no_ancestor_or_spent_output_resolves_the_value() {
    let parent_txid = parent_tx(0).compute_txid();
    let child = spending_tx(parent_txid, 0, 1_000);
    let expanded = ExpandedTx::new(child, vec![]);

    assert!(matches!(expanded.input_value(0), Err(ExpandedTxError::MissingInput(0))));
}
