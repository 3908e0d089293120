//! Keystore error types

use thiserror::Error;

use crate::error::CryptoError;

/// Errors that can occur during keystore operations
#[derive(Error, Debug)]
pub enum KeystoreError {
    /// MAC mismatch: the password is wrong or the ciphertext was altered
    #[error("wrong password: MAC verification failed")]
    WrongPassword,

    /// Record fields are structurally invalid (bad hex, wrong byte lengths)
    #[error("corrupt keystore record: {0}")]
    CorruptRecord(String),

    /// Caller supplied unusable KDF parameters
    #[error("invalid keystore configuration: {0}")]
    InvalidConfig(String),

    /// Key derivation failed
    #[error("key derivation failed: {0}")]
    KdfError(String),

    /// Random source unavailable while sampling the IV or salt
    #[error("entropy source failure: {0}")]
    EntropyFailure(String),

    /// Decrypted key does not belong to the expected address
    #[error("address mismatch: expected {expected}, recovered {actual}")]
    AddressMismatch { expected: String, actual: String },

    /// Key or address level failure
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for keystore operations
pub type KeystoreResult<T> = Result<T, KeystoreError>;
