// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hybrid RSA/AES primitives backing the framed transport (§4.1, §6).
//!
//! RSA-OAEP-2048 bootstraps a 32-byte AES-EAX session key, and passwords
//! are compared as `SHA-512(salt || password)` against a fixed,
//! build-time salt rather than a per-install one.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{KeyInit, KeySizeUser};
use aes::Aes256;
use eax::aead::{Aead, Payload};
use eax::Eax;
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256, Sha512};

use crate::error::TransportError;

/// RSA modulus size used for the bootstrap key exchange (§6).
pub const RSA_KEY_BITS: usize = 2048;

/// Session key length in bytes (AES-256, §4.1/§6).
pub const SESSION_KEY_LEN: usize = 32;

/// AES-EAX nonce length in bytes (§4.1).
pub const NONCE_LEN: usize = 16;

/// A nonce of all zero bytes signals "unencrypted" (§4.1) and must never be
/// produced by [`random_nonce`].
pub const ZERO_NONCE: [u8; NONCE_LEN] = [0u8; NONCE_LEN];

/// Fixed, build-time salt for password hashing (§6). Not a per-install
/// secret — identical across every server, matching the original's
/// hardcoded `_salt` class constant.
pub const PASSWORD_SALT: [u8; 32] = *b"RunQueue-fixed-build-time-salt!";

/// This node's RSA keypair, generated fresh per connection and never
/// persisted.
pub struct KeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl KeyPair {
    pub fn generate() -> Result<Self, TransportError> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
            .map_err(|e| TransportError::AuthenticationError(format!("rsa keygen: {e}")))?;
        let public = RsaPublicKey::from(&private);
        Ok(Self { private, public })
    }

    /// DER-encoded public key, the payload of a `PubKey` frame.
    pub fn public_key_der(&self) -> Result<Vec<u8>, TransportError> {
        self.public
            .to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| TransportError::AuthenticationError(format!("encode public key: {e}")))
    }

    /// Decrypt an RSA-OAEP ciphertext addressed to this key pair (used to
    /// recover the session key from a `SessionKey` frame).
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.private
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|e| TransportError::AuthenticationError(format!("rsa decrypt: {e}")))
    }
}

/// Parse a peer's DER-encoded public key out of a received `PubKey` frame.
pub fn decode_public_key(der: &[u8]) -> Result<RsaPublicKey, TransportError> {
    RsaPublicKey::from_public_key_der(der)
        .map_err(|e| TransportError::AuthenticationError(format!("decode public key: {e}")))
}

/// RSA-OAEP-encrypt `plaintext` (the fresh session key) for `peer_public_key`.
pub fn rsa_encrypt(peer_public_key: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>, TransportError> {
    peer_public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|e| TransportError::AuthenticationError(format!("rsa encrypt: {e}")))
}

/// Generate a fresh, random 32-byte AES session key.
pub fn generate_session_key() -> [u8; SESSION_KEY_LEN] {
    let mut key = [0u8; SESSION_KEY_LEN];
    OsRng.fill_bytes(&mut key);
    key
}

/// Generate a random, non-zero 16-byte nonce for one frame.
///
/// A collision with [`ZERO_NONCE`] is astronomically unlikely but would be
/// misread as "unencrypted" by the peer, so it is rejected and re-rolled.
pub fn random_nonce() -> [u8; NONCE_LEN] {
    loop {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        if nonce != ZERO_NONCE {
            return nonce;
        }
    }
}

fn cipher_for(session_key: &[u8; SESSION_KEY_LEN]) -> Eax<Aes256> {
    debug_assert_eq!(Aes256::key_size(), SESSION_KEY_LEN);
    <Eax<Aes256> as KeyInit>::new(GenericArray::from_slice(session_key))
}

/// Encrypt `plaintext` under `session_key` with `nonce` (AES-EAX, §4.1).
pub fn aes_encrypt(
    session_key: &[u8; SESSION_KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, TransportError> {
    let cipher = cipher_for(session_key);
    cipher
        .encrypt(nonce.into(), Payload::from(plaintext))
        .map_err(|_| TransportError::BadFrame("aes-eax encryption failed".into()))
}

/// Decrypt `ciphertext` under `session_key` with `nonce`.
pub fn aes_decrypt(
    session_key: &[u8; SESSION_KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, TransportError> {
    let cipher = cipher_for(session_key);
    cipher
        .decrypt(nonce.into(), Payload::from(ciphertext))
        .map_err(|_| TransportError::BadFrame("aes-eax decryption failed (bad key or tag)".into()))
}

/// `SHA-512(salt || password)`, the comparison the authenticator performs
/// against the server's stored hash (§4.5).
pub fn hash_password(password: &str) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(PASSWORD_SALT);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
#[path = "crypto_tests.rs"]
mod tests;
