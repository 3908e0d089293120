//! Key Derivation Function (KDF) implementation
//!
//! scrypt turns the password into `dklen` bytes. The first 16 bytes key the
//! AES-128-CTR cipher and bytes `16..32` key the MAC, so `dklen` must be at
//! least 32.

use rand::{rngs::OsRng, CryptoRng, RngCore};
use secrecy::{ExposeSecret, ExposeSecretMut};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::error::{KeystoreError, KeystoreResult};
use crate::secure::{IntoSecret, SecretBytes};

/// Smallest derived key that yields both the cipher key and the MAC key
pub const MIN_DKLEN: u32 = 32;

/// Largest derived key length accepted by the scrypt implementation
pub const MAX_DKLEN: u32 = 64;

/// Bytes of the derived key used as the AES-128 key
pub const ENCRYPTION_KEY_LENGTH: usize = 16;

/// Salt length used by the built-in policies
pub const SALT_LENGTH: usize = 32;

/// Upper bound on the memory a parameter set may ask scrypt for (2 GiB).
///
/// Applies to both working buffers, `128 * r * n` and `128 * r * p`.
/// `ScryptPolicy::STANDARD` needs 256 MiB.
pub const MAX_SCRYPT_MEMORY: u64 = 2 * 1024 * 1024 * 1024;

/// scrypt cost policy
///
/// Chosen by the caller when creating a keystore; the resulting parameters are
/// stored inside the record so decryption never depends on these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptPolicy {
    /// CPU/memory cost (power of two)
    pub n: u32,
    /// Block size
    pub r: u32,
    /// Parallelization
    pub p: u32,
    /// Derived key length in bytes
    pub dklen: u32,
    /// Random salt length in bytes
    #[serde(default = "default_salt_len")]
    pub salt_len: usize,
}

fn default_salt_len() -> usize {
    SALT_LENGTH
}

impl ScryptPolicy {
    /// N = 2^18, r = 8, p = 1
    pub const STANDARD: Self = Self {
        n: 1 << 18,
        r: 8,
        p: 1,
        dklen: 32,
        salt_len: SALT_LENGTH,
    };

    /// N = 2^12, r = 8, p = 6; for constrained devices
    pub const LIGHT: Self = Self {
        n: 1 << 12,
        r: 8,
        p: 6,
        dklen: 32,
        salt_len: SALT_LENGTH,
    };

    /// Draw a fresh salt from the OS CSPRNG and build concrete parameters.
    pub fn params(&self) -> KeystoreResult<KdfParams> {
        self.params_with_rng(&mut OsRng)
    }

    /// Same as [`ScryptPolicy::params`] with a caller-provided random source.
    pub fn params_with_rng<R: CryptoRng + RngCore>(&self, rng: &mut R) -> KeystoreResult<KdfParams> {
        let salt = generate_salt_with_rng(rng, self.salt_len)?;
        let params = KdfParams::with_salt(&salt, self.n, self.r, self.p, self.dklen);
        params.validate()?;
        Ok(params)
    }
}

impl Default for ScryptPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// scrypt parameters as carried in a keystore record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Salt as hex string
    pub salt: String,
    /// CPU/memory cost parameter (must be power of 2)
    pub n: u32,
    /// Block size parameter
    pub r: u32,
    /// Parallelization parameter
    pub p: u32,
    /// Derived key length in bytes
    pub dklen: u32,
}

impl KdfParams {
    /// Build parameters around an explicit salt
    pub fn with_salt(salt: &[u8], n: u32, r: u32, p: u32, dklen: u32) -> Self {
        Self {
            salt: hex::encode(salt),
            n,
            r,
            p,
            dklen,
        }
    }

    /// Validate the parameters
    pub fn validate(&self) -> KeystoreResult<()> {
        self.check().map(|_| ()).map_err(KeystoreError::InvalidConfig)
    }

    /// Decoded salt bytes
    pub fn salt_bytes(&self) -> KeystoreResult<Vec<u8>> {
        self.check().map_err(KeystoreError::InvalidConfig)
    }

    /// Derive a key from the given password
    pub fn derive_key(&self, password: &str) -> KeystoreResult<DerivedKey> {
        let salt = self.salt_bytes()?;
        let derived = scrypt_derive_key(
            password,
            &salt,
            self.n,
            self.r,
            self.p,
            self.dklen as usize,
        )?;
        Ok(DerivedKey(derived))
    }

    fn check(&self) -> Result<Vec<u8>, String> {
        if self.dklen < MIN_DKLEN {
            return Err(format!("dklen must be at least {}", MIN_DKLEN));
        }
        if self.dklen > MAX_DKLEN {
            return Err(format!("dklen must be at most {}", MAX_DKLEN));
        }
        if self.n < 2 || !self.n.is_power_of_two() {
            return Err("n must be a power of 2 greater than 1".to_string());
        }
        if self.r == 0 {
            return Err("r must be positive".to_string());
        }
        if self.p == 0 {
            return Err("p must be positive".to_string());
        }
        check_memory(self.n, self.r, self.p)?;
        let salt = hex::decode(&self.salt).map_err(|e| format!("invalid salt hex: {}", e))?;
        if salt.is_empty() {
            return Err("salt must not be empty".to_string());
        }
        Ok(salt)
    }
}

/// scrypt output held in secret memory
pub struct DerivedKey(SecretBytes);

impl DerivedKey {
    /// Bytes `0..16`: the AES-128 key
    pub fn encryption_key(&self) -> &[u8] {
        &self.0.expose_secret()[..ENCRYPTION_KEY_LENGTH]
    }

    /// Bytes `16..32`: the MAC key
    pub fn mac_key(&self) -> &[u8] {
        &self.0.expose_secret()[ENCRYPTION_KEY_LENGTH..MIN_DKLEN as usize]
    }

    /// Full derived key length
    pub fn len(&self) -> usize {
        self.0.expose_secret().len()
    }

    /// Always false for keys built through [`KdfParams::derive_key`]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("length", &self.len())
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Derive a key using scrypt KDF
///
/// # Arguments
///
/// * `password` - User password, taken as UTF-8 bytes
/// * `salt` - Random salt bytes
/// * `n` - CPU/memory cost parameter (must be power of 2)
/// * `r` - Block size parameter
/// * `p` - Parallelization parameter
/// * `dklen` - Desired key length in bytes
pub fn scrypt_derive_key(
    password: &str,
    salt: &[u8],
    n: u32,
    r: u32,
    p: u32,
    dklen: usize,
) -> KeystoreResult<SecretBytes> {
    if n < 2 || !n.is_power_of_two() {
        return Err(KeystoreError::InvalidConfig(
            "n must be a power of 2 greater than 1".to_string(),
        ));
    }
    check_memory(n, r, p).map_err(KeystoreError::InvalidConfig)?;
    let log_n = n.trailing_zeros() as u8;

    let params = scrypt::Params::new(log_n, r, p, dklen)
        .map_err(|e| KeystoreError::InvalidConfig(e.to_string()))?;

    let mut output = vec![0u8; dklen].into_secret();
    scrypt::scrypt(password.as_bytes(), salt, &params, output.expose_secret_mut())
        .map_err(|e| KeystoreError::KdfError(e.to_string()))?;

    Ok(output)
}

fn check_memory(n: u32, r: u32, p: u32) -> Result<(), String> {
    let block = 128 * u128::from(r);
    for (name, factor) in [("n", n), ("p", p)] {
        if block * u128::from(factor) > u128::from(MAX_SCRYPT_MEMORY) {
            return Err(format!(
                "128 * r * {} exceeds the {} byte scrypt memory limit",
                name, MAX_SCRYPT_MEMORY
            ));
        }
    }
    Ok(())
}

/// Generate a random salt of `len` bytes
pub fn generate_salt_with_rng<R: CryptoRng + RngCore>(
    rng: &mut R,
    len: usize,
) -> KeystoreResult<Vec<u8>> {
    let mut salt = vec![0u8; len];
    rng.try_fill_bytes(&mut salt).map_err(|e| {
        error!(error = %e, "random source failed while sampling salt");
        KeystoreError::EntropyFailure(e.to_string())
    })?;
    Ok(salt)
}
