//! Account address derivation
//!
//! An address is the Base58Check encoding of `0x00 || RIPEMD160(SHA256(pubkey))`
//! where `pubkey` is the 65-byte uncompressed public key. The decoded payload
//! is always 21 bytes: one version byte followed by the 20-byte address hash.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::base58check;
use crate::error::{CryptoError, CryptoResult};
use crate::hash::hash160;
use crate::keypair::PublicKey;

/// Address hash length in bytes
pub const ADDRESS_HASH_LENGTH: usize = 20;

/// Version byte prefixed to every address payload
pub const ADDRESS_VERSION: u8 = 0x00;

/// Decoded payload length (version + hash)
pub const ADDRESS_PAYLOAD_LENGTH: usize = 1 + ADDRESS_HASH_LENGTH;

/// 20-byte account identifier, `RIPEMD160(SHA256(pubkey))`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressHash([u8; ADDRESS_HASH_LENGTH]);

impl AddressHash {
    /// Hash an uncompressed public key
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self(hash160(public_key.as_bytes()))
    }

    /// Wrap a precomputed hash (e.g. a script hash)
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let arr: [u8; ADDRESS_HASH_LENGTH] =
            bytes.try_into().map_err(|_| CryptoError::InvalidLength {
                expected: ADDRESS_HASH_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Parse from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_HASH_LENGTH] {
        &self.0
    }

    /// Lowercase hex without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Encode as a Base58Check address.
    ///
    /// Both public-key and hash entry points end here so the payload layout
    /// and checksum live in one place.
    pub fn to_address(&self) -> Address {
        let mut payload = [0u8; ADDRESS_PAYLOAD_LENGTH];
        payload[0] = ADDRESS_VERSION;
        payload[1..].copy_from_slice(&self.0);
        Address {
            hash: *self,
            text: base58check::encode(&payload),
        }
    }
}

impl From<[u8; ADDRESS_HASH_LENGTH]> for AddressHash {
    fn from(bytes: [u8; ADDRESS_HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AddressHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for AddressHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AddressHash({})", self.to_hex())
    }
}

impl fmt::Display for AddressHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Base58Check account address
///
/// Holds both the text form and the decoded hash; values of this type always
/// carry a valid version-0 payload.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    hash: AddressHash,
    text: String,
}

impl Address {
    /// Borrow the textual form
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The 20-byte hash this address encodes
    pub fn hash(&self) -> &AddressHash {
        &self.hash
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.text)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hash = address_to_hash(s)?;
        Ok(Self {
            hash,
            text: s.to_string(),
        })
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Derive the address of an uncompressed public key.
pub fn address_from_public_key(public_key: &PublicKey) -> Address {
    AddressHash::from_public_key(public_key).to_address()
}

/// Encode an already computed 20-byte hash as an address.
pub fn address_from_hash(hash: &[u8]) -> CryptoResult<Address> {
    Ok(AddressHash::from_slice(hash)?.to_address())
}

/// Decode an address back to its 20-byte hash.
///
/// Fails with `InvalidChecksum` on a checksum mismatch, `InvalidLength` when
/// the payload is not exactly 21 bytes and `InvalidVersion` for a version
/// byte other than `0x00`.
pub fn address_to_hash(address: &str) -> CryptoResult<AddressHash> {
    let payload = base58check::decode(address)?;
    if payload.len() != ADDRESS_PAYLOAD_LENGTH {
        return Err(CryptoError::InvalidLength {
            expected: ADDRESS_PAYLOAD_LENGTH,
            actual: payload.len(),
        });
    }
    if payload[0] != ADDRESS_VERSION {
        return Err(CryptoError::InvalidVersion {
            expected: ADDRESS_VERSION,
            actual: payload[0],
        });
    }
    AddressHash::from_slice(&payload[1..])
}
