//! `peers` body: peer-channel-service administration (create/delete a
//! channel). The service account id and initial write token are derived
//! deterministically from the initiator's public key, so a bootstrapping
//! user needs no pre-existing service account.

use bitcoin::hashes::{hash160, Hash};

use crate::envelope::Envelope;
use crate::sor::{FieldReader, FieldWriter, SorRecord, SorResult};

use super::{read_header, wrap_body, BodyError, BodyResult};

pub const PROTOCOL_ID: &str = "peers";

const TYPE_CREATE_CHANNEL: u8 = 0;
const TYPE_DELETE_CHANNEL: u8 = 1;
const TYPE_ACCOUNT: u8 = 2;

/// A peer-channel-service account, derived from a public key rather than
/// allocated by the service: `account_id = hash160(pub_key)`,
/// `token = first 16 bytes of pub_key`. Sent as its own message when a
/// service announces the account it derived for a `CreateChannel` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub account_id: [u8; 20],
    pub token: [u8; 16],
}

impl SorRecord for Account {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.account_id);
        w.field(2, &self.token);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(Account { account_id: r.require(1)?, token: r.require(2)? })
    }
}

/// Derives the deterministic `(account_id, token)` pair for `public_key`
/// (SEC1-compressed, 33 bytes).
pub fn derive_account(public_key: &[u8]) -> Account {
    let account_id = hash160::Hash::hash(public_key).to_byte_array();
    let mut token = [0u8; 16];
    let take = public_key.len().min(16);
    token[..take].copy_from_slice(&public_key[..take]);
    Account { account_id, token }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateChannel {
    pub public_key: Vec<u8>,
    pub channel_name: Option<String>,
}

impl SorRecord for CreateChannel {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.public_key);
        w.optional_field(2, &self.channel_name);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(CreateChannel { public_key: r.require(1)?, channel_name: r.take(2)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteChannel {
    pub channel_id: String,
}

impl SorRecord for DeleteChannel {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.channel_id);
    }
    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(DeleteChannel { channel_id: r.require(1)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerChannelsMessage {
    CreateChannel(CreateChannel),
    DeleteChannel(DeleteChannel),
    Account(Account),
}

pub fn wrap(message: PeerChannelsMessage) -> Envelope {
    match message {
        PeerChannelsMessage::CreateChannel(c) => wrap_body(PROTOCOL_ID, TYPE_CREATE_CHANNEL, &c),
        PeerChannelsMessage::DeleteChannel(d) => wrap_body(PROTOCOL_ID, TYPE_DELETE_CHANNEL, &d),
        PeerChannelsMessage::Account(a) => wrap_body(PROTOCOL_ID, TYPE_ACCOUNT, &a),
    }
}

pub fn parse(envelope: Envelope) -> BodyResult<(Option<PeerChannelsMessage>, Envelope)> {
    let Some((_version, message_type)) = read_header(&envelope, PROTOCOL_ID)? else {
        return Ok((None, envelope));
    };

    let (message, residual) = match message_type {
        TYPE_CREATE_CHANNEL => {
            let (c, residual) = super::parse_record::<CreateChannel>(envelope)?;
            (PeerChannelsMessage::CreateChannel(c), residual)
        }
        TYPE_DELETE_CHANNEL => {
            let (d, residual) = super::parse_record::<DeleteChannel>(envelope)?;
            (PeerChannelsMessage::DeleteChannel(d), residual)
        }
        TYPE_ACCOUNT => {
            let (a, residual) = super::parse_record::<Account>(envelope)?;
            (PeerChannelsMessage::Account(a), residual)
        }
        other => return Err(BodyError::UnknownMessageType(other, PROTOCOL_ID)),
    };

    Ok((Some(message), residual))
}

pub fn response_code_to_string(code: u32) -> &'static str {
    match code {
        0 => "ok",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_derivation_is_stable() {
        let pub_key = vec![0x02; 33];
        let a = derive_account(&pub_key);
        let b = derive_account(&pub_key);
        assert_eq!(a, b);
        assert_eq!(a.token, pub_key[..16]);
    }

    #[test]
    fn create_channel_round_trips() {
        let message = PeerChannelsMessage::CreateChannel(CreateChannel {
            public_key: vec![0x03; 33],
            channel_name: Some("support".to_string()),
        });
        let envelope = wrap(message.clone());
        let (decoded, _) = parse(envelope).unwrap();
        assert_eq!(decoded, Some(message));
    }

    #[test]
    fn account_message_round_trips() {
        let pub_key = vec![0x02; 33];
        let account = derive_account(&pub_key);
        let message = PeerChannelsMessage::Account(account);
        let envelope = wrap(message.clone());
        let (decoded, _) = parse(envelope).unwrap();
        assert_eq!(decoded, Some(message));
    }
}
