use bitcoin::secp256k1::PublicKey;
use clap::Args;
use tracing::info;

use crate::registry::ProtocolRegistry;

/// Decode a hex-encoded wire message back into its typed parts
#[derive(Args)]
pub struct DecodeCommand {
    /// Hex-encoded envelope bytes
    pub hex: String,

    /// Hex-encoded SEC1-compressed base public key, to verify a signature
    #[arg(long)]
    pub public_key: Option<String>,
}

impl DecodeCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let bytes = hex::decode(&self.hex)?;
        let public_key = self
            .public_key
            .as_deref()
            .map(hex::decode)
            .transpose()?
            .map(|bytes| PublicKey::from_slice(&bytes))
            .transpose()?;

        let registry = ProtocolRegistry::standard();
        let message = registry.unwrap(&bytes, public_key.as_ref())?;

        info!(
            signed = message.signature.is_some(),
            wrapper_count = message.wrappers.len(),
            body_protocol = message.body.protocol_id(),
            "decoded wire message"
        );
        println!("signed: {}", message.signature.is_some());
        println!("wrappers: {:?}", message.wrappers);
        println!("body: {:?}", message.body);
        Ok(())
    }
}
