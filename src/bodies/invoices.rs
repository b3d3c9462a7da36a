//! `I` body: the vendor/buyer negotiation protocol (menu, purchase order,
//! invoice, transfer). See the module-level docs on [`fulfills`] for the
//! invariant that lets a `Transfer` satisfy a preceding `TransferRequest`.

use bitcoin::{Amount, OutPoint, ScriptBuf, Transaction, TxOut, Txid};

use crate::envelope::Envelope;
use crate::sor::{FieldReader, FieldWriter, SorError, SorRecord, SorResult, SorValue};
use crate::value::Decimal;

use super::{read_header, wrap_body, BodyError, BodyResult};

pub const PROTOCOL_ID: &str = "I";

const TYPE_REQUEST_MENU: u8 = 0;
const TYPE_MENU: u8 = 1;
const TYPE_PURCHASE_ORDER: u8 = 2;
const TYPE_INVOICE: u8 = 3;
const TYPE_TRANSFER_REQUEST: u8 = 4;
const TYPE_TRANSFER: u8 = 5;
const TYPE_TRANSFER_ACCEPT: u8 = 6;

/// A `(protocol, id)` pair identifying an asset. An empty `protocol` denotes
/// bitcoin itself, in which case `id` is empty and `Price.quantity` (not
/// `amount`) carries the satoshi value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub protocol: String,
    pub id: Vec<u8>,
}

impl Token {
    pub fn bitcoin() -> Self {
        Token { protocol: String::new(), id: Vec::new() }
    }

    pub fn is_bitcoin(&self) -> bool {
        self.protocol.is_empty()
    }
}

impl SorRecord for Token {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.protocol);
        w.field(2, &self.id);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(Token { protocol: r.require(1)?, id: r.require(2)? })
    }
}

/// Exactly one of `quantity` (satoshis, bitcoin token only) or `amount`
/// (fixed-precision decimal, any token) is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub token: Token,
    pub quantity: Option<u64>,
    pub amount: Option<Decimal>,
}

impl Price {
    pub fn satoshis(quantity: u64) -> Self {
        Price { token: Token::bitcoin(), quantity: Some(quantity), amount: None }
    }

    pub fn decimal(token: Token, amount: Decimal) -> Self {
        Price { token, quantity: None, amount: Some(amount) }
    }
}

impl SorRecord for Price {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.token);
        w.optional_field(2, &self.quantity);
        w.optional_field(3, &self.amount);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        let token = r.require(1)?;
        let quantity = r.take(2)?;
        let amount = r.take(3)?;
        if quantity.is_some() == amount.is_some() {
            return Err(SorError::UnsupportedFieldKind(0));
        }
        Ok(Price { token, quantity, amount })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub description: String,
    pub price: Price,
    pub quantity: u64,
}

impl SorRecord for Item {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.description);
        w.field(2, &self.price);
        w.field(3, &self.quantity);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(Item { description: r.require(1)?, price: r.require(2)?, quantity: r.require(3)? })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestMenu;

impl SorRecord for RequestMenu {
    fn marshal_fields(&self, _w: &mut FieldWriter) {}
    fn unmarshal_fields(_r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(RequestMenu)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub items: Vec<Item>,
}

impl SorRecord for Menu {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.items);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(Menu { items: r.require(1)? })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrder {
    pub items: Vec<Item>,
}

impl SorRecord for PurchaseOrder {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.items);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(PurchaseOrder { items: r.require(1)? })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub items: Vec<Item>,
}

impl SorRecord for Invoice {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.items);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(Invoice { items: r.require(1)? })
    }
}

/// A raw outpoint/sequence pair, as carried by a `TransferRequest`'s input
/// list (distinct from a fully-formed `bitcoin::TxIn`, which also needs a
/// script-sig/witness that doesn't exist yet at request time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedInput {
    pub outpoint: OutPoint,
    pub sequence: u32,
}

impl SorValue for RequestedInput {
    fn marshal(&self, out: &mut Vec<crate::script::ScriptItem>) {
        let mut w = FieldWriter::new();
        let txid_bytes: [u8; 32] = bitcoin::hashes::Hash::to_byte_array(self.outpoint.txid);
        w.field(1, &txid_bytes);
        w.field(2, &(self.outpoint.vout as u64));
        w.field(3, &(self.sequence as u64));
        out.extend(w.finish());
    }

    fn unmarshal(items: &[crate::script::ScriptItem]) -> SorResult<(Self, usize)> {
        let (mut r, consumed) = FieldReader::parse(items)?;
        let txid_bytes: [u8; 32] = r.require(1)?;
        let vout: u64 = r.require(2)?;
        let sequence: u64 = r.require(3)?;
        let outpoint = OutPoint { txid: Txid::from_byte_array(txid_bytes), vout: vout as u32 };
        Ok((RequestedInput { outpoint, sequence: sequence as u32 }, consumed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedOutput {
    pub script_pubkey: Vec<u8>,
    pub value: u64,
}

impl SorRecord for RequestedOutput {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.script_pubkey);
        w.field(2, &self.value);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(RequestedOutput { script_pubkey: r.require(1)?, value: r.require(2)? })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub inputs: Vec<RequestedInput>,
    pub outputs: Vec<RequestedOutput>,
}

impl SorRecord for TransferRequest {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.inputs);
        w.field(2, &self.outputs);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(TransferRequest { inputs: r.require(1)?, outputs: r.require(2)? })
    }
}

/// Wraps a raw transaction for transport: consensus-serialized bytes, since
/// `bitcoin::Transaction` has no `SorValue` impl of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub tx: Transaction,
}

impl SorRecord for Transfer {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        let bytes = bitcoin::consensus::serialize(&self.tx);
        w.field(1, &bytes);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        let bytes: Vec<u8> = r.require(1)?;
        let tx = bitcoin::consensus::deserialize(&bytes)
            .map_err(|_| SorError::UnsupportedFieldKind(1))?;
        Ok(Transfer { tx })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferAccept {
    pub txid: [u8; 32],
}

impl SorRecord for TransferAccept {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.txid);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(TransferAccept { txid: r.require(1)? })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceMessage {
    RequestMenu,
    Menu(Menu),
    PurchaseOrder(PurchaseOrder),
    Invoice(Invoice),
    TransferRequest(TransferRequest),
    Transfer(Transfer),
    TransferAccept(TransferAccept),
}

pub fn wrap(message: InvoiceMessage) -> Envelope {
    match message {
        InvoiceMessage::RequestMenu => wrap_body(PROTOCOL_ID, TYPE_REQUEST_MENU, &RequestMenu),
        InvoiceMessage::Menu(m) => wrap_body(PROTOCOL_ID, TYPE_MENU, &m),
        InvoiceMessage::PurchaseOrder(po) => wrap_body(PROTOCOL_ID, TYPE_PURCHASE_ORDER, &po),
        InvoiceMessage::Invoice(inv) => wrap_body(PROTOCOL_ID, TYPE_INVOICE, &inv),
        InvoiceMessage::TransferRequest(tr) => wrap_body(PROTOCOL_ID, TYPE_TRANSFER_REQUEST, &tr),
        InvoiceMessage::Transfer(t) => wrap_body(PROTOCOL_ID, TYPE_TRANSFER, &t),
        InvoiceMessage::TransferAccept(ta) => wrap_body(PROTOCOL_ID, TYPE_TRANSFER_ACCEPT, &ta),
    }
}

pub fn parse(envelope: Envelope) -> BodyResult<(Option<InvoiceMessage>, Envelope)> {
    let Some((_version, message_type)) = read_header(&envelope, PROTOCOL_ID)? else {
        return Ok((None, envelope));
    };

    let (message, residual) = match message_type {
        TYPE_REQUEST_MENU => {
            let (_, residual) = super::parse_record::<RequestMenu>(envelope)?;
            (InvoiceMessage::RequestMenu, residual)
        }
        TYPE_MENU => {
            let (m, residual) = super::parse_record::<Menu>(envelope)?;
            (InvoiceMessage::Menu(m), residual)
        }
        TYPE_PURCHASE_ORDER => {
            let (po, residual) = super::parse_record::<PurchaseOrder>(envelope)?;
            (InvoiceMessage::PurchaseOrder(po), residual)
        }
        TYPE_INVOICE => {
            let (inv, residual) = super::parse_record::<Invoice>(envelope)?;
            (InvoiceMessage::Invoice(inv), residual)
        }
        TYPE_TRANSFER_REQUEST => {
            let (tr, residual) = super::parse_record::<TransferRequest>(envelope)?;
            (InvoiceMessage::TransferRequest(tr), residual)
        }
        TYPE_TRANSFER => {
            let (t, residual) = super::parse_record::<Transfer>(envelope)?;
            (InvoiceMessage::Transfer(t), residual)
        }
        TYPE_TRANSFER_ACCEPT => {
            let (ta, residual) = super::parse_record::<TransferAccept>(envelope)?;
            (InvoiceMessage::TransferAccept(ta), residual)
        }
        other => return Err(BodyError::UnknownMessageType(other, PROTOCOL_ID)),
    };

    Ok((Some(message), residual))
}

/// A `Transfer` fulfills a `TransferRequest` iff every requested input
/// outpoint+sequence appears identically among the transfer's inputs and
/// every requested `(script, value)` output appears among the transfer's
/// outputs. Extra inputs/outputs on the transfer side are allowed.
pub fn fulfills(request: &TransferRequest, transfer: &Transfer) -> bool {
    let inputs_satisfied = request.inputs.iter().all(|requested| {
        transfer.tx.input.iter().any(|actual| {
            actual.previous_output == requested.outpoint && actual.sequence.0 == requested.sequence
        })
    });

    let outputs_satisfied = request.outputs.iter().all(|requested| {
        let requested_script = ScriptBuf::from_bytes(requested.script_pubkey.clone());
        let requested_value = Amount::from_sat(requested.value);
        transfer.tx.output.iter().any(|actual: &TxOut| {
            actual.script_pubkey == requested_script && actual.value == requested_value
        })
    });

    inputs_satisfied && outputs_satisfied
}

/// Scans `tx`'s outputs for the first well-formed embedded `Invoice`
/// envelope, returning `InvoiceMissing` if none is found. A malformed
/// envelope in one output does not stop the scan of later outputs.
pub fn extract_embedded_invoice(tx: &Transaction) -> BodyResult<Invoice> {
    for out in &tx.output {
        let bytes = out.script_pubkey.as_bytes();
        let Ok(envelope) = Envelope::parse(bytes) else { continue };
        if let Ok((Some(InvoiceMessage::Invoice(invoice)), _)) = parse(envelope) {
            return Ok(invoice);
        }
    }
    Err(BodyError::InvoiceMissing)
}

pub fn response_code_to_string(code: u32) -> &'static str {
    match code {
        0 => "ok",
        1 => "wrong_price",
        2 => "invoice_missing",
        3 => "transfer_does_not_fulfill",
        _ => "unknown",
    }
}
