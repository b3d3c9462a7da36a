use std::collections::HashMap;

use bitcoin::{Transaction, TxOut};

use super::ancestor::AncestorTx;
use super::error::{ExpandedTxError, ExpandedTxResult};

/// A transaction plus enough ancestry to resolve every input's spent value,
/// either directly (`spent_outputs`) or transitively through `ancestors`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedTx {
    pub tx: Transaction,
    pub ancestors: Vec<AncestorTx>,
    pub spent_outputs: Vec<Option<TxOut>>,
}

impl ExpandedTx {
    pub fn new(tx: Transaction, ancestors: Vec<AncestorTx>) -> Self {
        let spent_outputs = vec![None; tx.input.len()];
        ExpandedTx { tx, ancestors, spent_outputs }
    }

    fn ancestors_by_txid(&self) -> HashMap<bitcoin::Txid, &AncestorTx> {
        self.ancestors.iter().map(|a| (a.txid(), a)).collect()
    }

    /// Resolves the value spent by `self.tx.input[index]`, checking
    /// `spent_outputs[index]` first and falling back to the referenced
    /// ancestor's own output.
    pub fn input_value(&self, index: usize) -> ExpandedTxResult<bitcoin::Amount> {
        let input = self
            .tx
            .input
            .get(index)
            .ok_or(ExpandedTxError::InputIndexOutOfRange(index))?;

        if let Some(Some(out)) = self.spent_outputs.get(index) {
            return Ok(out.value);
        }

        let ancestors = self.ancestors_by_txid();
        let prev = input.previous_output;
        let ancestor_tx = ancestors
            .get(&prev.txid)
            .ok_or(ExpandedTxError::MissingInput(index))?
            .tx();
        ancestor_tx
            .output
            .get(prev.vout as usize)
            .map(|out| out.value)
            .ok_or(ExpandedTxError::MissingInput(index))
    }

    /// `sum(input_values) - sum(output_values)`. Fails with `NegativeFee`
    /// if outputs exceed inputs.
    pub fn calculate_fee(&self) -> ExpandedTxResult<bitcoin::Amount> {
        let mut total_in = bitcoin::Amount::ZERO;
        for index in 0..self.tx.input.len() {
            total_in += self.input_value(index)?;
        }
        let total_out: bitcoin::Amount = self.tx.output.iter().map(|o| o.value).sum();

        total_in
            .checked_sub(total_out)
            .ok_or_else(|| ExpandedTxError::NegativeFee((total_out - total_in).to_sat()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::absolute::LockTime;
    use bitcoin::transaction::Version;
    use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, TxIn, Witness};

    fn parent_tx(value: u64) -> Transaction {
        Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![],
            output: vec![TxOut { value: Amount::from_sat(value), script_pubkey: ScriptBuf::new() }],
        }
    }

    fn spending_tx(prev_txid: bitcoin::Txid, vout: u32, output_value: u64) -> Transaction {
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
    fn resolves_input_value_from_ancestor() {
        let parent = parent_tx(100_000);
        let parent_txid = parent.compute_txid();
        let child = spending_tx(parent_txid, 0, 90_000);

        let expanded = ExpandedTx::new(
            child,
            vec![AncestorTx::Unconfirmed { tx: parent, miner_acks: vec![] }],
        );

        assert_eq!(expanded.input_value(0).unwrap(), Amount::from_sat(100_000));
        assert_eq!(expanded.calculate_fee().unwrap(), Amount::from_sat(10_000));
    }

    #[test]
    fn resolves_input_value_from_spent_outputs_without_ancestor() {
        let parent_txid = parent_tx(0).compute_txid();
        let child = spending_tx(parent_txid, 0, 40_000);

        let mut expanded = ExpandedTx::new(child, vec![]);
        expanded.spent_outputs[0] = Some(TxOut { value: Amount::from_sat(50_000), script_pubkey: ScriptBuf::new() });

        assert_eq!(expanded.calculate_fee().unwrap(), Amount::from_sat(10_000));
    }

    #[test]
    fn missing_input_when_neither_source_supplies_a_value() {
        let parent_txid = parent_tx(0).compute_txid();
        let child = spending_tx(parent_txid, 0, 1_000);
        let expanded = ExpandedTx::new(child, vec![]);

        assert!(matches!(expanded.input_value(0), Err(ExpandedTxError::MissingInput(0))));
    }

    #[test]
    fn negative_fee_when_outputs_exceed_inputs() {
        let parent = parent_tx(1_000);
        let parent_txid = parent.compute_txid();
        let child = spending_tx(parent_txid, 0, 5_000);

        let expanded = ExpandedTx::new(child, vec![AncestorTx::Unconfirmed { tx: parent, miner_acks: vec![] }]);

        assert!(matches!(expanded.calculate_fee(), Err(ExpandedTxError::NegativeFee(_))));
    }
}
