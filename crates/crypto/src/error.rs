//! Error types for keys, hashes and addresses

use thiserror::Error;

/// Result type for key and address operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors raised by the key pair engine, the address deriver and the
/// Base58Check codec
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Scalar is zero or not below the secp256k1 group order
    #[error("invalid private key: scalar out of range")]
    InvalidPrivateKey,

    /// Bytes do not encode a point on secp256k1
    #[error("invalid public key bytes")]
    InvalidPublicKey,

    /// Input has the wrong number of bytes
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Base58Check checksum does not match the payload
    #[error("invalid checksum")]
    InvalidChecksum,

    /// Address carries an unknown version byte
    #[error("invalid address version: expected {expected:#04x}, got {actual:#04x}")]
    InvalidVersion { expected: u8, actual: u8 },

    /// Text is not valid hex or base58
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// The operating system random source failed
    #[error("entropy source failure: {0}")]
    EntropyFailure(String),
}
