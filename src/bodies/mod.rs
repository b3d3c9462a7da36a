//! Body protocols: the innermost, non-wrapping message in a wrapped
//! message. Every body protocol shares the same header shape — a version
//! byte, then a message-type opcode, then a SOR-encoded record — so the
//! framing is written once here and reused by each protocol module.

pub mod expanded_tx_message;
pub mod fee_requirements;
pub mod invoices;
pub mod merkle_proof;
pub mod peer_channels;
pub mod reject_response;
pub mod relationships;

use crate::envelope::Envelope;
use crate::script::{push_number_unsigned, script_number_value_unsigned, ScriptItem};
use crate::sor::{SorError, SorResult, SorValue};

/// Current body framing version. New message types append to the
/// message-type opcode space; they never renumber existing ones.
pub const BODY_VERSION: u8 = 0;

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error(transparent)]
    Sor(#[from] crate::sor::SorError),

    #[error(transparent)]
    Script(#[from] crate::script::ScriptError),

    #[error(transparent)]
    Wrapper(#[from] crate::wrappers::WrapperError),

    #[error("unsupported body protocol version {0}")]
    UnsupportedVersion(u8),

    #[error("unknown message-type opcode {0} for protocol {1:?}")]
    UnknownMessageType(u8, &'static str),

    #[error("a second Initiation was received for a relationship that already has one")]
    AlreadyInitiated,

    #[error("an Update was received before any Initiation for this relationship")]
    NotInitiated,

    #[error("the purchase price does not match the menu/invoice price")]
    WrongPrice,

    #[error("no well-formed Invoice was found among the transaction's outputs")]
    InvoiceMissing,

    #[error("the Transfer does not fulfill the preceding TransferRequest")]
    TransferDoesNotFulfill,

    #[error("SubInitiation/SubUpdate/SubTerminate requires OptionSubChannels to have been advertised at Initiation")]
    SubChannelsNotAdvertised,
}

pub type BodyResult<T> = Result<T, BodyError>;

/// Writes `(version, message_type, record...)` as a fresh single-layer
/// envelope under `protocol_id`.
pub fn wrap_body<T: SorValue>(protocol_id: &str, message_type: u8, record: &T) -> Envelope {
    let mut items = vec![
        push_number_unsigned(BODY_VERSION as u64),
        push_number_unsigned(message_type as u64),
    ];
    items.extend(crate::sor::marshal(record));
    Envelope::new(protocol_id, items)
}

/// If `envelope`'s leading protocol-id matches, reads the version and
/// message-type header and returns them along with the number of items the
/// header itself occupied (always 2). Returns `None` if the id doesn't match.
pub fn read_header(envelope: &Envelope, protocol_id: &str) -> BodyResult<Option<(u8, u8)>> {
    if envelope.leading_protocol_id() != Some(protocol_id) {
        return Ok(None);
    }
    let version = item_as_u8(envelope.payload.first())?;
    let message_type = item_as_u8(envelope.payload.get(1))?;
    if version != BODY_VERSION {
        return Err(BodyError::UnsupportedVersion(version));
    }
    Ok(Some((version, message_type)))
}

fn item_as_u8(item: Option<&ScriptItem>) -> BodyResult<u8> {
    let item = item.ok_or(SorError::TruncatedValue { tag: 0, expected: 1, found: 0 })?;
    Ok(script_number_value_unsigned(item)? as u8)
}

/// Decodes the SOR record following the 2-item `(version, message_type)`
/// header, returning the value and the residual envelope.
pub fn parse_record<T: SorValue>(envelope: Envelope) -> SorResult<(T, Envelope)> {
    let (value, consumed) = T::unmarshal(&envelope.payload[2..])?;
    let residual = envelope.strip(2 + consumed);
    Ok((value, residual))
}

/// The innermost, non-wrapping message of a wrapped message, whichever
/// body protocol it turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Relationship(relationships::RelationshipMessage),
    Invoice(invoices::InvoiceMessage),
    MerkleProof(crate::expanded_tx::MerkleProof),
    ExpandedTx(crate::expanded_tx::ExpandedTx),
    PeerChannels(peer_channels::PeerChannelsMessage),
    Reject(reject_response::Reject),
    FeeRequirements(crate::wrappers::fees::FeeRequirements),
}

impl Body {
    pub fn protocol_id(&self) -> &'static str {
        match self {
            Body::Relationship(_) => relationships::PROTOCOL_ID,
            Body::Invoice(_) => invoices::PROTOCOL_ID,
            Body::MerkleProof(_) => merkle_proof::PROTOCOL_ID,
            Body::ExpandedTx(_) => expanded_tx_message::PROTOCOL_ID,
            Body::PeerChannels(_) => peer_channels::PROTOCOL_ID,
            Body::Reject(_) => reject_response::PROTOCOL_ID,
            Body::FeeRequirements(_) => fee_requirements::PROTOCOL_ID,
        }
    }
}
