//! Secp256k1 key pair engine
//!
//! Private keys are 32-byte big-endian scalars in `[1, n - 1]`. Public keys
//! are always handled in their 65-byte uncompressed SEC1 form
//! (`0x04 || X || Y`) with both coordinates left-padded to 32 bytes.
//!
//! Uses the k256 crate for secp256k1 curve operations.

use k256::{elliptic_curve::sec1::ToEncodedPoint, SecretKey as K256SecretKey};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::error;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Private key length in bytes
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Uncompressed public key length in bytes
pub const PUBLIC_KEY_LENGTH: usize = 65;

/// SEC1 tag of an uncompressed point
const UNCOMPRESSED_TAG: u8 = 0x04;

/// Secp256k1 private key (32 bytes scalar)
///
/// The scalar is zeroized when dropped and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(K256SecretKey);

impl PrivateKey {
    /// Load from raw big-endian bytes.
    ///
    /// Fails with `InvalidLength` unless exactly 32 bytes are given, and with
    /// `InvalidPrivateKey` when the scalar is zero or not below the group order.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(CryptoError::InvalidLength {
                expected: PRIVATE_KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        K256SecretKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPrivateKey)
    }

    /// Load from a hex string (with or without `0x` prefix).
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = Zeroizing::new(
            hex::decode(s).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Serialize to bytes (32 bytes scalar, big-endian).
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_LENGTH]> {
        Zeroizing::new(self.0.to_bytes().into())
    }

    /// Hex encoding of the scalar, zeroized on drop.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_bytes().as_slice()))
    }

    /// Get the corresponding public key
    pub fn public_key(&self) -> PublicKey {
        derive_public_key(self)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Secp256k1 public key in uncompressed form (65 bytes, `0x04` prefix)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Load from uncompressed bytes. The point must lie on the curve.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(CryptoError::InvalidLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        if bytes[0] != UNCOMPRESSED_TAG {
            return Err(CryptoError::InvalidPublicKey);
        }
        k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;

        let mut arr = [0u8; PUBLIC_KEY_LENGTH];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Load from a hex string (with or without `0x` prefix).
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Raw uncompressed bytes
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Affine X coordinate, 32 bytes big-endian
    pub fn x(&self) -> &[u8] {
        &self.0[1..33]
    }

    /// Affine Y coordinate, 32 bytes big-endian
    pub fn y(&self) -> &[u8] {
        &self.0[33..]
    }

    /// Lowercase hex of the uncompressed bytes
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0[..9]))
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

/// Generate a new private key from the operating system's CSPRNG.
///
/// Fails with `EntropyFailure` if the random source is unavailable.
pub fn generate_private_key() -> CryptoResult<PrivateKey> {
    generate_private_key_with_rng(&mut OsRng)
}

/// Generate a new private key from the given random source.
///
/// Candidates outside `[1, n - 1]` are discarded and redrawn; a failing random
/// source is reported as `EntropyFailure` and not retried.
pub fn generate_private_key_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
) -> CryptoResult<PrivateKey> {
    let mut candidate = Zeroizing::new([0u8; PRIVATE_KEY_LENGTH]);
    loop {
        rng.try_fill_bytes(&mut candidate[..]).map_err(|e| {
            error!(error = %e, "random source failed during key generation");
            CryptoError::EntropyFailure(e.to_string())
        })?;

        if let Ok(sk) = K256SecretKey::from_slice(&candidate[..]) {
            return Ok(PrivateKey(sk));
        }
    }
}

/// Derive the uncompressed public key: `priv * G`.
pub fn derive_public_key(private_key: &PrivateKey) -> PublicKey {
    let encoded = private_key.0.public_key().to_encoded_point(false);
    let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
    bytes.copy_from_slice(encoded.as_bytes());
    PublicKey(bytes)
}

/// Derive the public key straight from raw scalar bytes.
pub fn derive_public_key_from_bytes(private_key: &[u8]) -> CryptoResult<PublicKey> {
    let private_key = PrivateKey::from_bytes(private_key)?;
    Ok(derive_public_key(&private_key))
}
