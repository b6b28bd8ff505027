//! Asymmetric payload encryption.
//!
//! Contestants encrypt their prediction series to the judge's X25519 public
//! key; only the judge's private key can recover it. Hybrid scheme:
//!
//! 1. Generate an ephemeral X25519 keypair per payload
//! 2. Derive a symmetric key from the Diffie-Hellman shared secret
//! 3. Encrypt the payload with ChaCha20-Poly1305
//!
//! The envelope stored in the asset field is a single hex string:
//! `ephemeral_public_key (32) ‖ nonce (12) ‖ ciphertext`.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;
use x25519_dalek::{EphemeralSecret, PublicKey, SharedSecret, StaticSecret};

/// Nonce size for ChaCha20-Poly1305 (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size
pub const TAG_SIZE: usize = 16;

/// Smallest well-formed envelope: ephemeral key + nonce + empty ciphertext
pub const ENVELOPE_MIN_BYTES: usize = 32 + NONCE_SIZE + TAG_SIZE;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
    #[error("decryption failed")]
    DecryptionFailed,
}

/// Parse a 32-byte hex private key (with or without `0x` prefix).
pub fn parse_private_key(hex_key: &str) -> Result<StaticSecret, CryptoError> {
    let stripped = hex_key.strip_prefix("0x").unwrap_or(hex_key);
    let bytes = hex::decode(stripped).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    let key: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKey("expected 32 bytes".to_string()))?;
    Ok(StaticSecret::from(key))
}

/// Derive the ChaCha20-Poly1305 key from an X25519 shared secret.
fn derive_symmetric_key(shared: &SharedSecret) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"predict-challenge-payload-v1");
    hasher.update(shared.as_bytes());
    let digest = hasher.finalize();

    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

/// Encrypt a payload to a recipient's public key.
///
/// Used by the contestant-side tooling and by tests; the judge only decrypts.
pub fn encrypt_payload(plaintext: &str, recipient: &PublicKey) -> Result<String, CryptoError> {
    let ephemeral = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_public = PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(recipient);
    let key = derive_symmetric_key(&shared);

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = *Nonce::from_slice(&nonce_bytes);

    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut envelope = Vec::with_capacity(32 + NONCE_SIZE + ciphertext.len());
    envelope.extend_from_slice(ephemeral_public.as_bytes());
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);
    Ok(hex::encode(envelope))
}

/// Decrypt an envelope with the judge's private key.
pub fn decrypt_payload(envelope_hex: &str, secret: &StaticSecret) -> Result<String, CryptoError> {
    let bytes = hex::decode(envelope_hex.trim())
        .map_err(|e| CryptoError::InvalidEnvelope(e.to_string()))?;
    if bytes.len() < ENVELOPE_MIN_BYTES {
        return Err(CryptoError::InvalidEnvelope(format!(
            "{} bytes, need at least {}",
            bytes.len(),
            ENVELOPE_MIN_BYTES
        )));
    }

    let ephemeral_public: [u8; 32] = bytes[..32]
        .try_into()
        .map_err(|_| CryptoError::InvalidEnvelope("bad ephemeral key".to_string()))?;
    let nonce = *Nonce::from_slice(&bytes[32..32 + NONCE_SIZE]);
    let ciphertext = &bytes[32 + NONCE_SIZE..];

    let shared = secret.diffie_hellman(&PublicKey::from(ephemeral_public));
    let key = derive_symmetric_key(&shared);

    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|_| CryptoError::DecryptionFailed)?;
    let plaintext = cipher
        .decrypt(&nonce, ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}
