//! S4 and S6 from the scenario list, through the crate's public API.

use bitcoin::absolute::LockTime;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use channels_core::bodies::invoices::{
    self, Invoice, InvoiceMessage, RequestedInput, RequestedOutput, Transfer, TransferRequest,
};

use crate::common::fixtures::coffee_item;

fn outpoint(byte: u8, vout: u32) -> OutPoint {
    OutPoint { txid: Txid::from_byte_array([byte; 32]), vout }
}

#[test]
fn transfer_fulfills_request_then_fails_once_an_output_is_removed() {
    let request = TransferRequest {
        inputs: vec![RequestedInput { outpoint: outpoint(1, 0), sequence: 0xffffffff }],
        outputs: vec![RequestedOutput { script_pubkey: vec![0xaa; 25], value: 100_000 }],
    };

    let fulfilling_tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: vec![
            TxIn {
                previous_output: outpoint(1, 0),
                script_sig: ScriptBuf::new(),
                sequence: Sequence(0xffffffff),
                witness: Witness::new(),
            },
            TxIn {
                previous_output: outpoint(2, 1),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            },
        ],
        output: vec![
            TxOut { value: Amount::from_sat(100_000), script_pubkey: ScriptBuf::from_bytes(vec![0xaa; 25]) },
            TxOut { value: Amount::from_sat(99_900), script_pubkey: ScriptBuf::from_bytes(vec![0xbb; 25]) },
        ],
    };
    let transfer = Transfer { tx: fulfilling_tx };
    assert!(invoices::fulfills(&request, &transfer));

    let missing_output_tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: transfer.tx.input.clone(),
        output: vec![transfer.tx.output[1].clone()],
    };
    assert!(!invoices::fulfills(&request, &Transfer { tx: missing_output_tx }));
}

#[test]
fn extract_finds_the_one_embedded_invoice_and_nothing_after_tampering() {
    let invoice = Invoice { items: vec![coffee_item()] };
    let envelope = invoices::wrap(InvoiceMessage::Invoice(invoice.clone()));
    let mut script_bytes = envelope.serialize();

    let tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: vec![],
        output: vec![
            TxOut { value: Amount::from_sat(0), script_pubkey: ScriptBuf::new() },
            TxOut { value: Amount::from_sat(0), script_pubkey: ScriptBuf::from_bytes(script_bytes.clone()) },
            TxOut { value: Amount::from_sat(0), script_pubkey: ScriptBuf::new() },
        ],
    };
    assert_eq!(invoices::extract_embedded_invoice(&tx).unwrap(), invoice);

    let last = script_bytes.len() - 1;
    script_bytes[last] ^= 0xff;
    let tampered_tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: vec![],
        output: vec![TxOut { value: Amount::from_sat(0), script_pubkey: ScriptBuf::from_bytes(script_bytes) }],
    };
    assert!(invoices::extract_embedded_invoice(&tampered_tx).is_err());
}
