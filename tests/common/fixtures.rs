//! Shared construction helpers for the integration suite: a random keypair
//! and a couple of representative bodies, so each test file isn't
//! re-deriving the same boilerplate.

use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use channels_core::bodies::invoices::{Item, Price};

pub fn random_key() -> SecretKey {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    SecretKey::from_slice(&bytes).unwrap()
}

pub fn keypair() -> (SecretKey, PublicKey) {
    let secp = Secp256k1::new();
    let secret = random_key();
    let public = PublicKey::from_secret_key(&secp, &secret);
    (secret, public)
}

pub fn coffee_item() -> Item {
    Item {
        description: "Coffee".to_string(),
        price: Price::satoshis(540_000),
        quantity: 1,
    }
}
