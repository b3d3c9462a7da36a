use bitcoin::secp256k1::SecretKey;
use clap::{Args, ValueEnum};
use tracing::info;

use crate::bodies::invoices::{self, InvoiceMessage};
use crate::bodies::peer_channels::{self, CreateChannel, PeerChannelsMessage};
use crate::signing;
use crate::wrappers::{self, note};

#[derive(Clone, Copy, ValueEnum)]
pub enum DemoBody {
    /// `InvoiceMessage::RequestMenu`
    RequestMenu,
    /// `PeerChannelsMessage::CreateChannel`, using `--public-key`
    CreateChannel,
}

/// Encode a demo body into a wrapped, optionally-signed envelope
#[derive(Args)]
pub struct EncodeCommand {
    #[arg(long, value_enum, default_value = "request-menu")]
    pub body: DemoBody,

    /// Hex-encoded SEC1-compressed public key, required for `create-channel`
    #[arg(long)]
    pub public_key: Option<String>,

    /// Attach a NOTE wrapper with this text
    #[arg(long)]
    pub note: Option<String>,

    /// Hex-encoded secp256k1 secret key; if set, the envelope is signed
    #[arg(long)]
    pub secret_key: Option<String>,

    /// Include the signer's public key in the signature payload
    #[arg(long)]
    pub include_public_key: bool,
}

impl EncodeCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let mut envelope = match self.body {
            DemoBody::RequestMenu => invoices::wrap(InvoiceMessage::RequestMenu),
            DemoBody::CreateChannel => {
                let public_key_hex = self
                    .public_key
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("--public-key is required for create-channel"))?;
                let public_key = hex::decode(public_key_hex)?;
                peer_channels::wrap(PeerChannelsMessage::CreateChannel(CreateChannel {
                    public_key,
                    channel_name: None,
                }))
            }
        };

        if let Some(text) = &self.note {
            envelope = wrappers::wrap_value(envelope, note::PROTOCOL_ID, text);
        }

        if let Some(secret_key_hex) = &self.secret_key {
            let secret_bytes = hex::decode(secret_key_hex)?;
            let key = SecretKey::from_slice(&secret_bytes)?;
            envelope = signing::sign(envelope, &key, None, self.include_public_key)?;
        }

        let bytes = envelope.serialize();
        info!(len = bytes.len(), "encoded demo envelope");
        println!("{}", hex::encode(bytes));
        Ok(())
    }
}
