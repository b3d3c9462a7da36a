//! S5: encode `Note(Response(Invoice))`, decode through the registry, and
//! confirm wrappers come back in the same order they were applied.

use channels_core::bodies::invoices::{self, InvoiceMessage};
use channels_core::registry::ProtocolRegistry;
use channels_core::wrappers::response::{Response, ResponseStatus};
use channels_core::wrappers::{self, note, response, Wrapper};

#[test]
fn note_around_response_around_invoice_decodes_in_observed_order() {
    let invoice = invoices::wrap(InvoiceMessage::RequestMenu);
    let with_response = response::wrap(
        invoice,
        &Response {
            status: ResponseStatus::Ok,
            code_protocol_id: "I".to_string(),
            code: 0,
            note: None,
        },
    );
    let with_note = wrappers::wrap_value(with_response, note::PROTOCOL_ID, &"for the record".to_string());

    let bytes = with_note.serialize();
    let registry = ProtocolRegistry::standard();
    let message = registry.unwrap(&bytes, None).unwrap();

    assert_eq!(message.wrappers.len(), 2);
    assert!(matches!(message.wrappers[0], Wrapper::Note(_)));
    assert!(matches!(message.wrappers[1], Wrapper::Response(_)));
    assert_eq!(message.body.protocol_id(), invoices::PROTOCOL_ID);
}

#[test]
fn reversing_application_order_reverses_observed_order() {
    let invoice = invoices::wrap(InvoiceMessage::RequestMenu);
    let with_note = wrappers::wrap_value(invoice, note::PROTOCOL_ID, &"for the record".to_string());
    let with_response = response::wrap(
        with_note,
        &Response {
            status: ResponseStatus::Ok,
            code_protocol_id: "I".to_string(),
            code: 0,
            note: None,
        },
    );

    let bytes = with_response.serialize();
    let registry = ProtocolRegistry::standard();
    let message = registry.unwrap(&bytes, None).unwrap();

    assert!(matches!(message.wrappers[0], Wrapper::Response(_)));
    assert!(matches!(message.wrappers[1], Wrapper::Note(_)));
}
