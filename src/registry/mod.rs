//! Protocol registry & dispatch: the single entry point that turns raw
//! wire bytes into a [`WrappedMessage`] — peel the signature if present,
//! peel wrapper layers in whatever order they were observed, then match the
//! remaining body.
//!
//! A [`ProtocolRegistry`] is a plain value, built with `.with_wrapper(id)`/
//! `.with_body(id)`, rather than a process-wide static table: two registries
//! in the same process can recognise different protocol subsets, which
//! matters for a host that only wants to accept a restricted dialect on one
//! channel.

mod error;

pub use error::{RegistryError, RegistryResult};

use std::collections::HashSet;

use bitcoin::secp256k1::PublicKey;

use crate::bodies::{self, Body};
use crate::envelope::Envelope;
use crate::signing::{self, Signature};
use crate::wrappers::{self, Wrapper};

type WrapperParseFn = fn(Envelope) -> wrappers::WrapperResult<(Option<Wrapper>, Envelope)>;
type BodyParseFn = fn(Envelope) -> bodies::BodyResult<(Option<Body>, Envelope)>;

macro_rules! wrapper_adapter {
    ($name:ident, $variant:ident, $module:ident) => {
        fn $name(envelope: Envelope) -> wrappers::WrapperResult<(Option<Wrapper>, Envelope)> {
            let (value, residual) = wrappers::$module::parse(envelope)?;
            Ok((value.map(Wrapper::$variant), residual))
        }
    };
}

wrapper_adapter!(adapt_response, Response, response);
wrapper_adapter!(adapt_reply_to, ReplyTo, reply_to);
wrapper_adapter!(adapt_uuid, Uuid, uuid);
wrapper_adapter!(adapt_string_id, StringId, string_id);
wrapper_adapter!(adapt_note, Note, note);
wrapper_adapter!(adapt_expiry, Expiry, expiry);
wrapper_adapter!(adapt_message_id, MessageId, message_id);
wrapper_adapter!(adapt_txid, TxId, txid);
wrapper_adapter!(adapt_fees, Fees, fees);
wrapper_adapter!(adapt_masked_input, MaskedInput, masked_input);

const WRAPPER_TABLE: &[(&str, WrapperParseFn)] = &[
    (wrappers::response::PROTOCOL_ID, adapt_response),
    (wrappers::reply_to::PROTOCOL_ID, adapt_reply_to),
    (wrappers::uuid::PROTOCOL_ID, adapt_uuid),
    (wrappers::string_id::PROTOCOL_ID, adapt_string_id),
    (wrappers::note::PROTOCOL_ID, adapt_note),
    (wrappers::expiry::PROTOCOL_ID, adapt_expiry),
    (wrappers::message_id::PROTOCOL_ID, adapt_message_id),
    (wrappers::txid::PROTOCOL_ID, adapt_txid),
    (wrappers::fees::PROTOCOL_ID, adapt_fees),
    (wrappers::masked_input::PROTOCOL_ID, adapt_masked_input),
];

macro_rules! body_adapter {
    ($name:ident, $variant:ident, $module:ident) => {
        fn $name(envelope: Envelope) -> bodies::BodyResult<(Option<Body>, Envelope)> {
            let (value, residual) = bodies::$module::parse(envelope)?;
            Ok((value.map(Body::$variant), residual))
        }
    };
}

body_adapter!(adapt_relationship, Relationship, relationships);
body_adapter!(adapt_invoice, Invoice, invoices);
body_adapter!(adapt_peer_channels, PeerChannels, peer_channels);
body_adapter!(adapt_reject, Reject, reject_response);
body_adapter!(adapt_fee_requirements, FeeRequirements, fee_requirements);

fn adapt_merkle_proof(envelope: Envelope) -> bodies::BodyResult<(Option<Body>, Envelope)> {
    let (value, residual) = bodies::merkle_proof::parse(envelope)?;
    Ok((value.map(Body::MerkleProof), residual))
}

fn adapt_expanded_tx(envelope: Envelope) -> bodies::BodyResult<(Option<Body>, Envelope)> {
    let (value, residual) = bodies::expanded_tx_message::parse(envelope)?;
    Ok((value.map(Body::ExpandedTx), residual))
}

const BODY_TABLE: &[(&str, BodyParseFn)] = &[
    (bodies::relationships::PROTOCOL_ID, adapt_relationship),
    (bodies::invoices::PROTOCOL_ID, adapt_invoice),
    (bodies::merkle_proof::PROTOCOL_ID, adapt_merkle_proof),
    (bodies::expanded_tx_message::PROTOCOL_ID, adapt_expanded_tx),
    (bodies::peer_channels::PROTOCOL_ID, adapt_peer_channels),
    (bodies::reject_response::PROTOCOL_ID, adapt_reject),
    (bodies::fee_requirements::PROTOCOL_ID, adapt_fee_requirements),
];

type CodeToStringFn = fn(u32) -> &'static str;

const CODE_TABLE: &[(&str, CodeToStringFn)] = &[
    (bodies::relationships::PROTOCOL_ID, bodies::relationships::response_code_to_string),
    (bodies::invoices::PROTOCOL_ID, bodies::invoices::response_code_to_string),
    (bodies::merkle_proof::PROTOCOL_ID, bodies::merkle_proof::response_code_to_string),
    (bodies::expanded_tx_message::PROTOCOL_ID, bodies::expanded_tx_message::response_code_to_string),
    (bodies::peer_channels::PROTOCOL_ID, bodies::peer_channels::response_code_to_string),
    (bodies::reject_response::PROTOCOL_ID, bodies::reject_response::response_code_to_string),
    (bodies::fee_requirements::PROTOCOL_ID, bodies::fee_requirements::response_code_to_string),
];

/// Dispatches a `(protocol_id, code)` pair to the owning body protocol's
/// code-to-string mapping. Unknown protocol ids, not just unknown codes,
/// fall back to `"parse"` so a logger can always print something.
pub fn code_to_string(protocol_id: &str, code: u32) -> &'static str {
    CODE_TABLE
        .iter()
        .find(|(id, _)| *id == protocol_id)
        .map(|(_, f)| f(code))
        .unwrap_or("parse")
}

/// A fully unwrapped wire message: the verified (or absent) signature, the
/// wrapper layers in the order they were observed (outermost first), and
/// the terminal body.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedMessage {
    pub signature: Option<Signature>,
    pub wrappers: Vec<Wrapper>,
    pub body: Body,
}

/// The set of protocol-ids a registry instance recognises. Built up
/// explicitly rather than defaulting to "everything", so a host can scope
/// down what a given channel accepts.
#[derive(Debug, Clone, Default)]
pub struct ProtocolRegistry {
    wrappers: HashSet<&'static str>,
    bodies: HashSet<&'static str>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        ProtocolRegistry::default()
    }

    /// A registry recognising every wrapper and body protocol this crate
    /// implements.
    pub fn standard() -> Self {
        let mut registry = ProtocolRegistry::new();
        for (id, _) in WRAPPER_TABLE {
            registry.wrappers.insert(id);
        }
        for (id, _) in BODY_TABLE {
            registry.bodies.insert(id);
        }
        registry
    }

    pub fn with_wrapper(mut self, protocol_id: &'static str) -> Self {
        self.wrappers.insert(protocol_id);
        self
    }

    pub fn with_body(mut self, protocol_id: &'static str) -> Self {
        self.bodies.insert(protocol_id);
        self
    }

    fn try_wrapper(&self, envelope: Envelope) -> RegistryResult<(Option<Wrapper>, Envelope)> {
        let Some(id) = envelope.leading_protocol_id() else {
            return Ok((None, envelope));
        };
        let Some((_, parse)) = WRAPPER_TABLE.iter().find(|(table_id, _)| *table_id == id) else {
            return Ok((None, envelope));
        };
        if !self.wrappers.contains(id) {
            return Ok((None, envelope));
        }
        Ok(parse(envelope)?)
    }

    fn try_body(&self, envelope: Envelope) -> RegistryResult<Option<Body>> {
        let Some(id) = envelope.leading_protocol_id() else {
            return Ok(None);
        };
        let Some((_, parse)) = BODY_TABLE.iter().find(|(table_id, _)| *table_id == id) else {
            return Ok(None);
        };
        if !self.bodies.contains(id) {
            return Ok(None);
        }
        let (value, _residual) = parse(envelope)?;
        Ok(value)
    }

    /// Parses raw wire bytes into a [`WrappedMessage`]. If `base_public_key`
    /// is supplied and the message is signed, the signature is verified
    /// before any wrapper or body is inspected; a signed message with no
    /// key supplied is returned unverified rather than rejected, since the
    /// registry doesn't know ahead of time whether the caller cares.
    pub fn unwrap(&self, bytes: &[u8], base_public_key: Option<&PublicKey>) -> RegistryResult<WrappedMessage> {
        tracing::debug!(len = bytes.len(), "unwrapping wire message");
        let envelope = Envelope::parse(bytes)?;
        let unsigned = envelope.clone();

        let (signature, envelope) = match signing::parse(envelope)? {
            Some((mut signature, residual)) => {
                if let Some(key) = base_public_key {
                    signature.set_public_key(key);
                    signature.verify(Some(key))?;
                }
                (Some(signature), residual)
            }
            None => (None, unsigned),
        };

        // A body match is tried before a wrapper match at every step, not just
        // once at the end: `FEES` is both an ordinary wrapper id and the
        // terminus-bearing shape of a standalone `FeeRequirementsMessage`, and
        // only trying the body first lets the latter be recognised before the
        // wrapper table greedily peels it.
        let mut wrappers = Vec::new();
        let mut envelope = envelope;
        let body = loop {
            if let Some(body) = self.try_body(envelope.clone())? {
                break body;
            }
            let (maybe, residual) = self.try_wrapper(envelope)?;
            envelope = residual;
            match maybe {
                Some(wrapper) => wrappers.push(wrapper),
                None => {
                    let leading = envelope.leading_protocol_id().map(str::to_string).unwrap_or_default();
                    return Err(RegistryError::UnsupportedProtocol(leading));
                }
            }
        };

        tracing::debug!(protocol_id = body.protocol_id(), wrapper_count = wrappers.len(), "dispatched body");
        Ok(WrappedMessage { signature, wrappers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::fee_requirements;
    use crate::bodies::invoices::{self, InvoiceMessage};
    use crate::wrappers::fees::FeeSpec;
    use bitcoin::secp256k1::{Secp256k1, SecretKey};
    use rand::RngCore;

    fn random_key() -> SecretKey {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        SecretKey::from_slice(&bytes).unwrap()
    }

    #[test]
    fn unwraps_unsigned_body_with_no_wrappers() {
        let envelope = invoices::wrap(InvoiceMessage::RequestMenu);
        let bytes = envelope.serialize();

        let registry = ProtocolRegistry::standard();
        let message = registry.unwrap(&bytes, None).unwrap();

        assert!(message.signature.is_none());
        assert!(message.wrappers.is_empty());
        assert_eq!(message.body, Body::Invoice(InvoiceMessage::RequestMenu));
    }

    #[test]
    fn unwraps_and_verifies_signed_body() {
        let key = random_key();
        let secp = Secp256k1::new();
        let pubkey = bitcoin::secp256k1::PublicKey::from_secret_key(&secp, &key);

        let envelope = invoices::wrap(InvoiceMessage::RequestMenu);
        let signed = signing::sign(envelope, &key, None, false).unwrap();
        let bytes = signed.serialize();

        let registry = ProtocolRegistry::standard();
        let message = registry.unwrap(&bytes, Some(&pubkey)).unwrap();

        assert!(message.signature.is_some());
        assert_eq!(message.body, Body::Invoice(InvoiceMessage::RequestMenu));
    }

    #[test]
    fn peels_wrappers_in_observed_order() {
        let envelope = invoices::wrap(InvoiceMessage::RequestMenu);
        let envelope = wrappers::wrap_value(envelope, wrappers::note::PROTOCOL_ID, &"hello".to_string());
        let bytes = envelope.serialize();

        let registry = ProtocolRegistry::standard();
        let message = registry.unwrap(&bytes, None).unwrap();

        assert_eq!(message.wrappers.len(), 1);
        assert!(matches!(message.wrappers[0], Wrapper::Note(_)));
    }

    #[test]
    fn code_to_string_falls_back_to_parse_for_unknown_protocol() {
        assert_eq!(code_to_string("RS", 1), "already_initiated");
        assert_eq!(code_to_string("nope", 1), "parse");
    }

    #[test]
    fn unwraps_standalone_fee_requirements_as_its_own_body() {
        let fees = vec![FeeSpec { fee_type: 0, sat_numerator: 1, byte_denominator: 2 }];
        let envelope = fee_requirements::wrap(&fees);
        let bytes = envelope.serialize();

        let registry = ProtocolRegistry::standard();
        let message = registry.unwrap(&bytes, None).unwrap();

        assert!(message.wrappers.is_empty());
        assert_eq!(message.body, Body::FeeRequirements(fees));
    }

    #[test]
    fn fees_wrapper_around_another_body_still_dispatches_to_that_body() {
        let fees = vec![FeeSpec { fee_type: 0, sat_numerator: 1, byte_denominator: 2 }];
        let envelope = invoices::wrap(InvoiceMessage::RequestMenu);
        let envelope = wrappers::fees::wrap(envelope, &fees);
        let bytes = envelope.serialize();

        let registry = ProtocolRegistry::standard();
        let message = registry.unwrap(&bytes, None).unwrap();

        assert_eq!(message.wrappers.len(), 1);
        assert!(matches!(message.wrappers[0], Wrapper::Fees(_)));
        assert_eq!(message.body, Body::Invoice(InvoiceMessage::RequestMenu));
    }

    #[test]
    fn unsupported_body_protocol_is_rejected_by_a_scoped_down_registry() {
        let envelope = invoices::wrap(InvoiceMessage::RequestMenu);
        let bytes = envelope.serialize();

        let registry = ProtocolRegistry::new(); // recognises nothing
        let err = registry.unwrap(&bytes, None).unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedProtocol(_)));
    }
}
