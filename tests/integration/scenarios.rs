//! The concrete end-to-end scenarios from the scenario list, driven through
//! [`ProtocolRegistry::unwrap`] the way a host actually would: S2/S3 live in
//! `signing.rs` and S4/S6 in `invoices_fulfills.rs` since they don't touch
//! the registry; S5 lives in `wrapper_order.rs`. This file covers S1 and
//! the registry's code-to-string dispatch end to end.

use channels_core::bodies::invoices::{self, Item, Menu, Price};
use channels_core::bodies::Body;
use channels_core::registry::{self, ProtocolRegistry};
use channels_core::signing;

use crate::common::fixtures::keypair;

/// S1 — Menu: a vendor builds a one-item Menu, signs including the public
/// key, and a registry decode must surface the verified signature and the
/// exact body.
#[test]
fn vendor_menu_decodes_with_verified_signature() {
    let (secret, public) = keypair();
    let menu = Menu {
        items: vec![Item { description: "Coffee".to_string(), price: Price::satoshis(540_000), quantity: 1 }],
    };
    let envelope = invoices::wrap(invoices::InvoiceMessage::Menu(menu.clone()));
    let signed = signing::sign(envelope, &secret, None, true).unwrap();
    let bytes = signed.serialize();

    let registry = ProtocolRegistry::standard();
    let message = registry.unwrap(&bytes, Some(&public)).unwrap();

    assert!(message.signature.is_some());
    assert_eq!(message.body, Body::Invoice(invoices::InvoiceMessage::Menu(menu)));
}

#[test]
fn code_to_string_dispatches_through_the_owning_protocol() {
    assert_eq!(registry::code_to_string("I", 1), "wrong_price");
    assert_eq!(registry::code_to_string("RS", 2), "not_initiated");
    assert_eq!(registry::code_to_string("I", 99), "unknown");
    assert_eq!(registry::code_to_string("XX", 0), "parse");
}

#[test]
fn a_registry_scoped_to_one_wrapper_still_rejects_unrecognised_bodies() {
    let envelope = invoices::wrap(invoices::InvoiceMessage::RequestMenu);
    let bytes = envelope.serialize();

    let registry = ProtocolRegistry::new().with_wrapper(channels_core::wrappers::note::PROTOCOL_ID);
    let err = registry.unwrap(&bytes, None).unwrap_err();
    assert!(matches!(err, channels_core::registry::RegistryError::UnsupportedProtocol(_)));
}
