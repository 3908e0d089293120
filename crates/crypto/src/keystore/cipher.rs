//! AES-128-CTR stream cipher for keystore payloads
//!
//! CTR mode keeps ciphertext the same length as the plaintext, so a 32-byte
//! private key always encrypts to 32 bytes.

use aes::Aes128;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use rand::{CryptoRng, RngCore};
use secrecy::ExposeSecretMut;
use tracing::error;

use super::error::{KeystoreError, KeystoreResult};
use crate::secure::{IntoSecret, SecretBytes};

/// IV (initialization vector) length for AES-128-CTR
pub const IV_LENGTH: usize = 16;

/// AES-128 key length
pub const AES_KEY_LENGTH: usize = 16;

/// Type alias for AES-128-CTR cipher
type Aes128Ctr = Ctr128BE<Aes128>;

/// Encrypt data using AES-128-CTR
///
/// Only the first 16 bytes of `key` are used, so the full derived key may be
/// passed in.
pub fn encrypt_secret(secret: &[u8], key: &[u8], iv: &[u8]) -> KeystoreResult<Vec<u8>> {
    let mut buffer = secret.to_vec();
    apply_keystream(&mut buffer, key, iv)?;
    Ok(buffer)
}

/// Decrypt data using AES-128-CTR
///
/// The plaintext is returned in secret memory.
pub fn decrypt_secret(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> KeystoreResult<SecretBytes> {
    let mut buffer = ciphertext.to_vec().into_secret();
    apply_keystream(buffer.expose_secret_mut(), key, iv)?;
    Ok(buffer)
}

fn apply_keystream(buffer: &mut [u8], key: &[u8], iv: &[u8]) -> KeystoreResult<()> {
    if key.len() < AES_KEY_LENGTH {
        return Err(KeystoreError::InvalidConfig(format!(
            "cipher key must be at least {} bytes, got {}",
            AES_KEY_LENGTH,
            key.len()
        )));
    }

    let iv: &[u8; IV_LENGTH] = iv.try_into().map_err(|_| {
        KeystoreError::CorruptRecord(format!("IV must be {} bytes, got {}", IV_LENGTH, iv.len()))
    })?;
    let key: &[u8; AES_KEY_LENGTH] = key[..AES_KEY_LENGTH]
        .try_into()
        .map_err(|_| KeystoreError::InvalidConfig("key conversion failed".to_string()))?;

    let mut cipher = Aes128Ctr::new(key.into(), iv.into());
    cipher.apply_keystream(buffer);
    Ok(())
}

/// Generate a random IV
pub fn generate_iv_with_rng<R: CryptoRng + RngCore>(rng: &mut R) -> KeystoreResult<[u8; IV_LENGTH]> {
    let mut iv = [0u8; IV_LENGTH];
    rng.try_fill_bytes(&mut iv).map_err(|e| {
        error!(error = %e, "random source failed while sampling IV");
        KeystoreError::EntropyFailure(e.to_string())
    })?;
    Ok(iv)
}
