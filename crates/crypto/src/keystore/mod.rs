//! Password-encrypted keystore for secp256k1 private keys
//!
//! The format supports:
//!
//! - Password-based key derivation using scrypt
//! - AES-128-CTR symmetric encryption (ciphertext length equals key length)
//! - Keccak-256 MAC over `derived_key[16:32] || ciphertext`
//! - JSON serialization for portability
//!
//! Decryption verifies the MAC before touching the ciphertext; a mismatch is
//! reported as [`KeystoreError::WrongPassword`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ledgerid_crypto::keystore::{
//!     decrypt_private_key, encrypt_private_key, KeystoreRecord, ScryptPolicy,
//! };
//!
//! let params = ScryptPolicy::STANDARD.params()?;
//! let record = encrypt_private_key(&private_key, "my-strong-password", &params)?;
//! let json = record.to_json()?;
//!
//! let restored = decrypt_private_key(&KeystoreRecord::from_json(&json)?, "my-strong-password")?;
//! ```

mod cipher;
mod error;
mod kdf;
mod mac;
mod record;

pub use cipher::{decrypt_secret, encrypt_secret, generate_iv_with_rng, IV_LENGTH};
pub use error::{KeystoreError, KeystoreResult};
pub use kdf::{
    generate_salt_with_rng, scrypt_derive_key, DerivedKey, KdfParams, ScryptPolicy,
    MAX_SCRYPT_MEMORY, MIN_DKLEN, SALT_LENGTH,
};
pub use mac::{compute_mac, verify_mac, MAC_LENGTH};
pub use record::{
    decrypt_and_verify, decrypt_private_key, encrypt_private_key, encrypt_private_key_with_rng,
    KeystoreRecord,
};
