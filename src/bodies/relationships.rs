//! `RS` body: relationship lifecycle. `Initiation` establishes a logical
//! channel, `Update` replaces its configuration and/or identity, and the
//! `Sub*` variants manage auxiliary channels under the same relationship.
//!
//! `AlreadyInitiated`/`NotInitiated` are per-channel state invariants, not
//! parse-time conditions — they're enforced by [`RelationshipState`], which a
//! host drives explicitly as it observes messages for a given channel.

use crate::envelope::Envelope;
use crate::sor::{FieldReader, FieldWriter, SorError, SorRecord, SorResult, SorValue};

use super::{read_header, wrap_body, BodyError, BodyResult};

pub const PROTOCOL_ID: &str = "RS";

const TYPE_INITIATION: u8 = 0;
const TYPE_UPDATE: u8 = 1;
const TYPE_SUB_INITIATION: u8 = 2;
const TYPE_SUB_UPDATE: u8 = 3;
const TYPE_SUB_TERMINATE: u8 = 4;

/// A protocol-level option advertised in a `ChannelConfiguration`. New
/// options append; they never renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOption {
    SubChannels,
    RequireAncestorsToMerkleProofs,
}

impl ChannelOption {
    fn to_u64(self) -> u64 {
        match self {
            ChannelOption::SubChannels => 0,
            ChannelOption::RequireAncestorsToMerkleProofs => 1,
        }
    }

    fn from_u64(value: u64) -> SorResult<Self> {
        Ok(match value {
            0 => ChannelOption::SubChannels,
            1 => ChannelOption::RequireAncestorsToMerkleProofs,
            other => return Err(SorError::UnsupportedFieldKind(other)),
        })
    }
}

impl SorValue for ChannelOption {
    fn marshal(&self, out: &mut Vec<crate::script::ScriptItem>) {
        self.to_u64().marshal(out)
    }

    fn unmarshal(items: &[crate::script::ScriptItem]) -> SorResult<(Self, usize)> {
        let (raw, consumed) = u64::unmarshal(items)?;
        Ok((ChannelOption::from_u64(raw)?, consumed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfiguration {
    pub public_key: Vec<u8>,
    pub peer_channels: Vec<String>,
    pub supported_protocols: Vec<String>,
    pub protocol_options: Vec<ChannelOption>,
}

impl SorRecord for ChannelConfiguration {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.public_key);
        w.field(2, &self.peer_channels);
        w.field(3, &self.supported_protocols);
        w.field(4, &self.protocol_options);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(ChannelConfiguration {
            public_key: r.require(1)?,
            peer_channels: r.require(2)?,
            supported_protocols: r.require(3)?,
            protocol_options: r.require(4)?,
        })
    }
}

impl ChannelConfiguration {
    pub fn has_option(&self, option: ChannelOption) -> bool {
        self.protocol_options.contains(&option)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
    pub handle: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

impl SorRecord for Identity {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.optional_field(1, &self.name);
        w.optional_field(2, &self.email);
        w.optional_field(3, &self.url);
        w.optional_field(4, &self.handle);
        w.optional_field(5, &self.phone);
        w.optional_field(6, &self.location);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(Identity {
            name: r.take(1)?,
            email: r.take(2)?,
            url: r.take(3)?,
            handle: r.take(4)?,
            phone: r.take(5)?,
            location: r.take(6)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiationPayload {
    pub configuration: ChannelConfiguration,
    pub identity: Identity,
}

impl SorRecord for InitiationPayload {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.configuration);
        w.field(2, &self.identity);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(InitiationPayload { configuration: r.require(1)?, identity: r.require(2)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdatePayload {
    pub configuration: Option<ChannelConfiguration>,
    pub identity: Option<Identity>,
}

impl SorRecord for UpdatePayload {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.optional_field(1, &self.configuration);
        w.optional_field(2, &self.identity);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(UpdatePayload { configuration: r.take(1)?, identity: r.take(2)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubChannelId(pub String);

impl SorRecord for SubChannelId {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.0);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(SubChannelId(r.require(1)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipMessage {
    Initiation(InitiationPayload),
    Update(UpdatePayload),
    SubInitiation { sub_channel: SubChannelId, payload: InitiationPayload },
    SubUpdate { sub_channel: SubChannelId, payload: UpdatePayload },
    SubTerminate { sub_channel: SubChannelId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SubInitiationRecord {
    sub_channel: SubChannelId,
    payload: InitiationPayload,
}

impl SorRecord for SubInitiationRecord {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.sub_channel);
        w.field(2, &self.payload);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(SubInitiationRecord { sub_channel: r.require(1)?, payload: r.require(2)? })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SubUpdateRecord {
    sub_channel: SubChannelId,
    payload: UpdatePayload,
}

impl SorRecord for SubUpdateRecord {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.sub_channel);
        w.field(2, &self.payload);
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> SorResult<Self> {
        Ok(SubUpdateRecord { sub_channel: r.require(1)?, payload: r.require(2)? })
    }
}

pub fn wrap(inner: RelationshipMessage) -> Envelope {
    match inner {
        RelationshipMessage::Initiation(payload) => wrap_body(PROTOCOL_ID, TYPE_INITIATION, &payload),
        RelationshipMessage::Update(payload) => wrap_body(PROTOCOL_ID, TYPE_UPDATE, &payload),
        RelationshipMessage::SubInitiation { sub_channel, payload } => {
            wrap_body(PROTOCOL_ID, TYPE_SUB_INITIATION, &SubInitiationRecord { sub_channel, payload })
        }
        RelationshipMessage::SubUpdate { sub_channel, payload } => {
            wrap_body(PROTOCOL_ID, TYPE_SUB_UPDATE, &SubUpdateRecord { sub_channel, payload })
        }
        RelationshipMessage::SubTerminate { sub_channel } => {
            wrap_body(PROTOCOL_ID, TYPE_SUB_TERMINATE, &sub_channel)
        }
    }
}

pub fn parse(envelope: Envelope) -> BodyResult<(Option<RelationshipMessage>, Envelope)> {
    let Some((_version, message_type)) = read_header(&envelope, PROTOCOL_ID)? else {
        return Ok((None, envelope));
    };

    let (message, residual) = match message_type {
        TYPE_INITIATION => {
            let (payload, residual) = super::parse_record::<InitiationPayload>(envelope)?;
            (RelationshipMessage::Initiation(payload), residual)
        }
        TYPE_UPDATE => {
            let (payload, residual) = super::parse_record::<UpdatePayload>(envelope)?;
            (RelationshipMessage::Update(payload), residual)
        }
        TYPE_SUB_INITIATION => {
            let (record, residual) = super::parse_record::<SubInitiationRecord>(envelope)?;
            (RelationshipMessage::SubInitiation { sub_channel: record.sub_channel, payload: record.payload }, residual)
        }
        TYPE_SUB_UPDATE => {
            let (record, residual) = super::parse_record::<SubUpdateRecord>(envelope)?;
            (RelationshipMessage::SubUpdate { sub_channel: record.sub_channel, payload: record.payload }, residual)
        }
        TYPE_SUB_TERMINATE => {
            let (sub_channel, residual) = super::parse_record::<SubChannelId>(envelope)?;
            (RelationshipMessage::SubTerminate { sub_channel }, residual)
        }
        other => return Err(BodyError::UnknownMessageType(other, PROTOCOL_ID)),
    };

    Ok((Some(message), residual))
}

/// Maps this protocol's reject/response codes to a short stable string for
/// logging. Unknown codes are the caller's responsibility to fall back on.
pub fn response_code_to_string(code: u32) -> &'static str {
    match code {
        0 => "ok",
        1 => "already_initiated",
        2 => "not_initiated",
        3 => "sub_channels_not_advertised",
        _ => "unknown",
    }
}

/// Per-channel state tracker enforcing `AlreadyInitiated`/`NotInitiated` and
/// the `Sub*` precondition that `OptionSubChannels` was advertised. The
/// registry's `unwrap` dispatch never calls this; a host drives it
/// explicitly once it has decided which logical channel a message belongs to.
#[derive(Debug, Default)]
pub struct RelationshipState {
    initiated: bool,
    protocol_options: Vec<ChannelOption>,
}

impl RelationshipState {
    pub fn new() -> Self {
        RelationshipState::default()
    }

    fn has_sub_channels(&self) -> bool {
        self.protocol_options.contains(&ChannelOption::SubChannels)
    }

    pub fn observe(&mut self, message: &RelationshipMessage) -> BodyResult<()> {
        match message {
            RelationshipMessage::Initiation(payload) => {
                if self.initiated {
                    return Err(BodyError::AlreadyInitiated);
                }
                self.initiated = true;
                self.protocol_options = payload.configuration.protocol_options.clone();
            }
            RelationshipMessage::Update(payload) => {
                if !self.initiated {
                    return Err(BodyError::NotInitiated);
                }
                if let Some(configuration) = &payload.configuration {
                    self.protocol_options = configuration.protocol_options.clone();
                }
            }
            RelationshipMessage::SubInitiation { .. }
            | RelationshipMessage::SubUpdate { .. }
            | RelationshipMessage::SubTerminate { .. } => {
                if !self.initiated {
                    return Err(BodyError::NotInitiated);
                }
                if !self.has_sub_channels() {
                    return Err(BodyError::SubChannelsNotAdvertised);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ChannelConfiguration {
        ChannelConfiguration {
            public_key: vec![0x02; 33],
            peer_channels: vec!["https://peer.example/channel/abc".to_string()],
            supported_protocols: vec!["I".to_string(), "RS".to_string()],
            protocol_options: vec![ChannelOption::SubChannels],
        }
    }

    #[test]
    fn initiation_round_trips() {
        let message = RelationshipMessage::Initiation(InitiationPayload {
            configuration: sample_config(),
            identity: Identity { name: Some("Vendor".to_string()), ..Default::default() },
        });
        let envelope = wrap(message.clone());
        let (decoded, residual) = parse(envelope).unwrap();
        assert_eq!(decoded, Some(message));
        assert!(residual.protocol_ids.is_empty());
    }

    #[test]
    fn state_rejects_second_initiation() {
        let mut state = RelationshipState::new();
        let message = RelationshipMessage::Initiation(InitiationPayload {
            configuration: sample_config(),
            identity: Identity::default(),
        });
        state.observe(&message).unwrap();
        assert!(matches!(state.observe(&message), Err(BodyError::AlreadyInitiated)));
    }

    #[test]
    fn state_rejects_update_before_initiation() {
        let mut state = RelationshipState::new();
        let message = RelationshipMessage::Update(UpdatePayload::default());
        assert!(matches!(state.observe(&message), Err(BodyError::NotInitiated)));
    }

    #[test]
    fn state_accepts_sub_initiation_when_sub_channels_was_advertised() {
        let mut state = RelationshipState::new();
        let initiation = RelationshipMessage::Initiation(InitiationPayload {
            configuration: sample_config(),
            identity: Identity::default(),
        });
        state.observe(&initiation).unwrap();

        let sub_initiation = RelationshipMessage::SubInitiation {
            sub_channel: SubChannelId("sub-1".to_string()),
            payload: InitiationPayload { configuration: sample_config(), identity: Identity::default() },
        };
        assert!(state.observe(&sub_initiation).is_ok());
    }

    #[test]
    fn state_rejects_sub_initiation_when_sub_channels_was_not_advertised() {
        let mut state = RelationshipState::new();
        let mut configuration = sample_config();
        configuration.protocol_options = vec![ChannelOption::RequireAncestorsToMerkleProofs];
        let initiation = RelationshipMessage::Initiation(InitiationPayload {
            configuration,
            identity: Identity::default(),
        });
        state.observe(&initiation).unwrap();

        let sub_terminate = RelationshipMessage::SubTerminate { sub_channel: SubChannelId("sub-1".to_string()) };
        assert!(matches!(state.observe(&sub_terminate), Err(BodyError::SubChannelsNotAdvertised)));
    }

    #[test]
    fn state_rechecks_sub_channels_option_after_update_changes_configuration() {
        let mut state = RelationshipState::new();
        let initiation = RelationshipMessage::Initiation(InitiationPayload {
            configuration: sample_config(),
            identity: Identity::default(),
        });
        state.observe(&initiation).unwrap();

        let mut configuration = sample_config();
        configuration.protocol_options = vec![];
        let update = RelationshipMessage::Update(UpdatePayload {
            configuration: Some(configuration),
            identity: None,
        });
        state.observe(&update).unwrap();

        let sub_update = RelationshipMessage::SubUpdate {
            sub_channel: SubChannelId("sub-1".to_string()),
            payload: UpdatePayload::default(),
        };
        assert!(matches!(state.observe(&sub_update), Err(BodyError::SubChannelsNotAdvertised)));
    }
}
