//! Property 2: `unmarshal(marshal(x)) == x`, exercised here through a real
//! nested record (a relationship `Initiation`) rather than a bare scalar, so
//! the nested-record framing and the `Vec<ChannelOption>` sequence field are
//! both covered.

use channels_core::bodies::relationships::{
    ChannelConfiguration, ChannelOption, Identity, InitiationPayload,
};
use channels_core::sor::{marshal, unmarshal, SorResult};

#[test]
fn nested_record_with_sequences_and_optionals_round_trips() {
    let payload = InitiationPayload {
        configuration: ChannelConfiguration {
            public_key: vec![0x02; 33],
            peer_channels: vec![
                "https://peer.example/channel/abc".to_string(),
                "https://peer.example/channel/def".to_string(),
            ],
            supported_protocols: vec!["I".to_string(), "RS".to_string(), "peers".to_string()],
            protocol_options: vec![ChannelOption::SubChannels, ChannelOption::RequireAncestorsToMerkleProofs],
        },
        identity: Identity {
            name: Some("Vendor".to_string()),
            email: None,
            url: Some("https://vendor.example".to_string()),
            handle: None,
            phone: None,
            location: None,
        },
    };

    let items = marshal(&payload);
    let decoded: InitiationPayload = unmarshal(&items).unwrap();

    assert_eq!(decoded, payload);
}

#[test]
fn truncated_items_fail_rather_than_panic() {
    let payload = InitiationPayload {
        configuration: ChannelConfiguration {
            public_key: vec![0x03; 33],
            peer_channels: vec![],
            supported_protocols: vec![],
            protocol_options: vec![],
        },
        identity: Identity::default(),
    };
    let mut items = marshal(&payload);
    items.truncate(items.len() - 1);

    let decoded: SorResult<InitiationPayload> = unmarshal(&items);
    assert!(decoded.is_err());
}
