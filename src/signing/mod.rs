//! The signing layer: the outermost wrapper on the wire. Computes a
//! canonical SHA-256 hash over the nested envelope it wraps, signs it with
//! secp256k1 ECDSA, optionally tweaks the key by a derivation hash for
//! per-message key isolation, and verifies on receive.

mod error;

pub use error::{SigningError, SigningResult};

use bitcoin::secp256k1::{ecdsa, Message, PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

use crate::envelope::Envelope;
use crate::script::{push_number_unsigned, write_script_item};
use crate::sor::{FieldReader, FieldWriter, SorRecord};

pub const PROTOCOL_ID: &str = "S";

/// `(signature_bytes, public_key?, derivation_hash?, transient_hash)`. The
/// transient hash is computed at parse time over the remaining inner
/// envelope; it is never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub signature: Vec<u8>,
    pub public_key: Option<[u8; 33]>,
    pub derivation_hash: Option<[u8; 32]>,
    transient_hash: Option<[u8; 32]>,
    base_public_key: Option<[u8; 33]>,
}

impl Signature {
    fn new(signature: Vec<u8>, public_key: Option<[u8; 33]>, derivation_hash: Option<[u8; 32]>) -> Self {
        Signature {
            signature,
            public_key,
            derivation_hash,
            transient_hash: None,
            base_public_key: None,
        }
    }

    /// Supplies the base public key for a signature that omitted its own
    /// (scenario: sender signed without `include_public_key`). Subsequent
    /// calls to [`Self::get_public_key`] / [`Self::verify`] use it.
    pub fn set_public_key(&mut self, base_public_key: &PublicKey) {
        self.base_public_key = Some(base_public_key.serialize());
    }

    /// The transient hash computed when this signature was parsed, if any.
    pub fn transient_hash(&self) -> Option<[u8; 32]> {
        self.transient_hash
    }

    /// Returns the effective signing public key: the embedded key if the
    /// sender included one, otherwise the supplied/stored base key tweaked
    /// by the derivation hash (if any).
    pub fn get_public_key(&self) -> SigningResult<PublicKey> {
        if let Some(bytes) = self.public_key {
            return Ok(PublicKey::from_slice(&bytes)?);
        }
        let base_bytes = self.base_public_key.ok_or(SigningError::PublicKeyMissing)?;
        let base = PublicKey::from_slice(&base_bytes)?;
        match self.derivation_hash {
            None => Ok(base),
            Some(hash) => {
                let secp = Secp256k1::new();
                let scalar = Scalar::from_be_bytes(hash)
                    .map_err(|e| SigningError::Derivation(e.to_string()))?;
                Ok(base.add_exp_tweak(&secp, &scalar)?)
            }
        }
    }

    /// Verifies the signature against its transient hash, using `base_public_key`
    /// if supplied, falling back to a previously [`Self::set_public_key`]d key.
    pub fn verify(&self, base_public_key: Option<&PublicKey>) -> SigningResult<()> {
        let hash = self.transient_hash.ok_or(SigningError::HashMissing)?;

        let public_key = if let Some(pk) = base_public_key {
            if self.public_key.is_some() {
                self.get_public_key()?
            } else {
                let secp = Secp256k1::new();
                match self.derivation_hash {
                    None => *pk,
                    Some(h) => {
                        let scalar = Scalar::from_be_bytes(h)
                            .map_err(|e| SigningError::Derivation(e.to_string()))?;
                        pk.add_exp_tweak(&secp, &scalar)?
                    }
                }
            }
        } else {
            self.get_public_key()?
        };

        let secp = Secp256k1::verification_only();
        let msg = Message::from_digest_slice(&hash)?;
        let sig = ecdsa::Signature::from_compact(&self.signature)
            .map_err(|_| SigningError::InvalidSignature)?;
        secp.verify_ecdsa(&msg, &sig, &public_key)
            .map_err(|_| SigningError::InvalidSignature)
    }
}

impl SorRecord for Signature {
    fn marshal_fields(&self, w: &mut FieldWriter) {
        w.field(1, &self.signature);
        w.optional_field(2, &self.public_key.map(|k| k.to_vec()));
        w.optional_field(3, &self.derivation_hash.map(|h| h.to_vec()));
    }

    fn unmarshal_fields(r: &mut FieldReader<'_>) -> crate::sor::SorResult<Self> {
        let signature: Vec<u8> = r.require(1)?;
        let public_key: Option<Vec<u8>> = r.take(2)?;
        let derivation_hash: Option<Vec<u8>> = r.take(3)?;

        let public_key = match public_key {
            Some(bytes) if bytes.len() == 33 => {
                let mut arr = [0u8; 33];
                arr.copy_from_slice(&bytes);
                Some(arr)
            }
            Some(_) => return Err(crate::sor::SorError::UnsupportedFieldKind(2)),
            None => None,
        };
        let derivation_hash = match derivation_hash {
            Some(bytes) if bytes.len() == 32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(&bytes);
                Some(arr)
            }
            Some(_) => return Err(crate::sor::SorError::UnsupportedFieldKind(3)),
            None => None,
        };

        Ok(Signature::new(signature, public_key, derivation_hash))
    }
}

/// The canonical hash covered by a signature: SHA-256 over every remaining
/// protocol-id followed by the serialized script items of the remaining
/// payload, in wire order.
pub fn canonical_hash(envelope: &Envelope) -> [u8; 32] {
    let mut buf = Vec::new();
    for id in &envelope.protocol_ids {
        buf.extend_from_slice(id.as_bytes());
    }
    for item in &envelope.payload {
        write_script_item(&mut buf, item).expect("writing to a Vec<u8> never fails");
    }
    Sha256::digest(&buf).into()
}

/// Signs `inner`, producing an envelope with the signature as its outermost
/// layer. `derivation_hash`, when set, additively tweaks `key` before signing.
pub fn sign(
    inner: Envelope,
    key: &SecretKey,
    derivation_hash: Option<[u8; 32]>,
    include_public_key: bool,
) -> SigningResult<Envelope> {
    let hash = canonical_hash(&inner);
    let secp = Secp256k1::new();

    let effective_key = match derivation_hash {
        None => *key,
        Some(h) => {
            let scalar =
                Scalar::from_be_bytes(h).map_err(|e| SigningError::Derivation(e.to_string()))?;
            key.add_tweak(&scalar)?
        }
    };

    let msg = Message::from_digest_slice(&hash)?;
    let sig = secp.sign_ecdsa(&msg, &effective_key);

    let public_key = if include_public_key {
        Some(PublicKey::from_secret_key(&secp, &effective_key).serialize())
    } else {
        None
    };

    let signature = Signature::new(sig.serialize_compact().to_vec(), public_key, derivation_hash);
    let items = crate::sor::marshal(&signature);
    let mut wire_items = vec![push_number_unsigned(0)];
    wire_items.extend(items);

    tracing::debug!(has_public_key = include_public_key, has_derivation = derivation_hash.is_some(), "signed envelope");
    Ok(inner.wrap(PROTOCOL_ID, wire_items))
}

/// Strips the outermost signature layer, if present, computing its transient
/// hash over the residual envelope. Returns `Ok(None)` if the envelope isn't
/// signed.
pub fn parse(envelope: Envelope) -> SigningResult<Option<(Signature, Envelope)>> {
    if envelope.leading_protocol_id() != Some(PROTOCOL_ID) {
        return Ok(None);
    }
    let version_item = envelope
        .payload
        .first()
        .ok_or(SigningError::Envelope(crate::envelope::EnvelopeError::NotEnvelope))?;
    let _version = crate::script::script_number_value_unsigned(version_item)?;

    let (mut signature, consumed) = <Signature as crate::sor::SorValue>::unmarshal(&envelope.payload[1..])?;
    let residual = envelope.strip(1 + consumed);
    signature.transient_hash = Some(canonical_hash(&residual));
    tracing::trace!("stripped signature layer, computed transient hash");
    Ok(Some((signature, residual)))
}
