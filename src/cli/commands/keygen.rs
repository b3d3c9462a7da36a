use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use clap::Args;
use rand::RngCore;
use tracing::info;

/// Generate a secp256k1 keypair for signing demo messages
#[derive(Args)]
pub struct KeygenCommand {}

impl KeygenCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let secret = SecretKey::from_slice(&bytes)?;
        let secp = Secp256k1::new();
        let public = PublicKey::from_secret_key(&secp, &secret);

        info!("generated a new secp256k1 keypair");
        println!("secret_key: {}", hex::encode(secret.secret_bytes()));
        println!("public_key: {}", hex::encode(public.serialize()));
        Ok(())
    }
}
