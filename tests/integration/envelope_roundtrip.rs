//! Property 1: `parse(serialize(e)) == e` for envelopes carrying a real
//! body, not just the synthetic ones already covered by the envelope
//! module's own unit tests.

use channels_core::bodies::invoices::{self, InvoiceMessage};
use channels_core::envelope::Envelope;
use channels_core::wrappers::{self, note};

#[test]
fn round_trips_a_body_wrapped_in_a_note() {
    let envelope = invoices::wrap(InvoiceMessage::RequestMenu);
    let envelope = wrappers::wrap_value(envelope, note::PROTOCOL_ID, &"hi there".to_string());

    let bytes = envelope.serialize();
    let parsed = Envelope::parse(&bytes).unwrap();

    assert_eq!(parsed, envelope);
}

#[test]
fn rejects_bytes_with_no_op_false_op_return_prefix() {
    let bytes = [0x51, 0x52, 0x53, 0x54];
    assert!(Envelope::parse(&bytes).is_err());
}
