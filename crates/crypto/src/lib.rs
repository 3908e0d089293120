//! Identity and keystore primitives for ledgerid accounts
//!
//! This crate provides:
//! - Hash chain primitives (SHA-256, RIPEMD-160, Keccak-256)
//! - Base58Check text encoding
//! - secp256k1 private/public key handling with fixed-width serialization
//! - Account address derivation (`Base58Check(0x00 || RIPEMD160(SHA256(pubkey)))`)
//! - Password-encrypted keystore records (scrypt + AES-128-CTR + Keccak-256 MAC)
//! - Secret memory wrappers that zeroize on drop

pub mod account;
pub mod address;
pub mod base58check;
pub mod error;
pub mod hash;
pub mod keypair;
pub mod keystore;
pub mod secure;

// Key pair exports
pub use keypair::{
    derive_public_key, derive_public_key_from_bytes, generate_private_key,
    generate_private_key_with_rng, PrivateKey, PublicKey,
};

// Account exports
pub use account::Account;

// Address exports
pub use address::{address_from_hash, address_from_public_key, address_to_hash, Address, AddressHash};

// Error exports
pub use error::{CryptoError, CryptoResult};

// Keystore exports
pub use keystore::{
    decrypt_and_verify, decrypt_private_key, encrypt_private_key, KdfParams, KeystoreError,
    KeystoreRecord, ScryptPolicy,
};

// Secure memory exports
pub use secure::{IntoSecret, SecretBytes};
