//! Base58Check codec
//!
//! Text form is `base58(payload || checksum)` where the checksum is the first
//! four bytes of `SHA256(SHA256(payload))`, using the Bitcoin alphabet.

use crate::error::{CryptoError, CryptoResult};

/// Number of checksum bytes appended to the payload
pub const CHECKSUM_LENGTH: usize = 4;

/// Encode a payload with an appended double-SHA256 checksum.
pub fn encode(payload: &[u8]) -> String {
    bs58::encode(payload).with_check().into_string()
}

/// Decode Base58Check text and return the payload without its checksum.
pub fn decode(text: &str) -> CryptoResult<Vec<u8>> {
    bs58::decode(text)
        .with_check(None)
        .into_vec()
        .map_err(map_decode_error)
}

fn map_decode_error(err: bs58::decode::Error) -> CryptoError {
    match err {
        bs58::decode::Error::InvalidChecksum { .. } => CryptoError::InvalidChecksum,
        bs58::decode::Error::NoChecksum => CryptoError::InvalidLength {
            expected: CHECKSUM_LENGTH,
            actual: 0,
        },
        other => CryptoError::InvalidEncoding(other.to_string()),
    }
}
