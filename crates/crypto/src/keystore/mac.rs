//! Keccak-256 MAC for keystore integrity verification
//!
//! The MAC is computed over: derived_key[16:32] || ciphertext
//! It binds the ciphertext to the password without exposing the cipher key.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::error::{KeystoreError, KeystoreResult};
use super::kdf::DerivedKey;
use crate::hash::keccak256;

/// MAC length in bytes
pub const MAC_LENGTH: usize = 32;

/// Compute keccak256(mac_key || ciphertext)
pub fn compute_mac(mac_key: &[u8], ciphertext: &[u8]) -> [u8; MAC_LENGTH] {
    let mut buf = Zeroizing::new(Vec::with_capacity(mac_key.len() + ciphertext.len()));
    buf.extend_from_slice(mac_key);
    buf.extend_from_slice(ciphertext);
    keccak256(&buf)
}

/// Compute the MAC for a ciphertext under a derived key
pub fn derived_mac(derived_key: &DerivedKey, ciphertext: &[u8]) -> [u8; MAC_LENGTH] {
    compute_mac(derived_key.mac_key(), ciphertext)
}

/// Verify the MAC in constant time
///
/// Returns `WrongPassword` on mismatch.
pub fn verify_mac(
    derived_key: &DerivedKey,
    ciphertext: &[u8],
    expected: &[u8],
) -> KeystoreResult<()> {
    let computed = derived_mac(derived_key, ciphertext);

    if bool::from(computed.as_slice().ct_eq(expected)) {
        Ok(())
    } else {
        Err(KeystoreError::WrongPassword)
    }
}
