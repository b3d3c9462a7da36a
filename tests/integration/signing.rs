//! S2/S3 from the scenario list, exercised through the crate's public API
//! end-to-end (sign -> serialize -> parse bytes -> verify), rather than the
//! signing module's own unit tests which stay in-process on `Envelope`
//! values.

use bitcoin::secp256k1::{Scalar, Secp256k1};
use channels_core::bodies::invoices::{self, InvoiceMessage};
use channels_core::envelope::Envelope;
use channels_core::signing::{self, SigningError};

use crate::common::fixtures;

#[test]
fn purchase_order_signed_without_key_verifies_after_set_public_key() {
    let (secret, public) = fixtures::keypair();
    let envelope = invoices::wrap(InvoiceMessage::PurchaseOrder(invoices::PurchaseOrder {
        items: vec![fixtures::coffee_item()],
    }));
    let signed = signing::sign(envelope, &secret, None, false).unwrap();
    let bytes = signed.serialize();

    let parsed = Envelope::parse(&bytes).unwrap();
    let (mut signature, _residual) = signing::parse(parsed).unwrap().unwrap();

    assert!(matches!(signature.verify(None), Err(SigningError::PublicKeyMissing)));

    signature.set_public_key(&public);
    signature.verify(None).unwrap();
}

#[test]
fn derivation_hash_produces_a_tweaked_recoverable_public_key() {
    let (secret, public) = fixtures::keypair();
    let mut hash = [0u8; 32];
    use rand::RngCore;
    rand::thread_rng().fill_bytes(&mut hash);

    let envelope = invoices::wrap(InvoiceMessage::RequestMenu);
    let signed = signing::sign(envelope, &secret, Some(hash), false).unwrap();
    let bytes = signed.serialize();

    let parsed = Envelope::parse(&bytes).unwrap();
    let (mut signature, _residual) = signing::parse(parsed).unwrap().unwrap();
    signature.set_public_key(&public);

    let secp = Secp256k1::new();
    let scalar = Scalar::from_be_bytes(hash).unwrap();
    let expected = public.add_exp_tweak(&secp, &scalar).unwrap();

    assert_eq!(signature.get_public_key().unwrap(), expected);
    signature.verify(None).unwrap();
}
