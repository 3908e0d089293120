//! Encrypted keystore record
//!
//! Ties the KDF, cipher and MAC modules into the encrypt/decrypt cycle for a
//! raw secp256k1 private key. The record is self-describing: the scrypt
//! parameters used at encryption time travel with it.

use rand::{rngs::OsRng, CryptoRng, RngCore};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cipher::{decrypt_secret, encrypt_secret, generate_iv_with_rng, IV_LENGTH};
use super::error::{KeystoreError, KeystoreResult};
use super::kdf::{DerivedKey, KdfParams};
use super::mac::{derived_mac, verify_mac, MAC_LENGTH};
use crate::address::{address_from_public_key, Address};
use crate::keypair::{PrivateKey, PRIVATE_KEY_LENGTH};

/// Password-encrypted private key
///
/// Wire shape:
/// `{"ciphertext": hex, "iv": hex, "mac": hex, "kdfparams": {"salt", "n", "r", "p", "dklen"}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreRecord {
    /// AES-128-CTR ciphertext of the private key, hex
    pub ciphertext: String,
    /// Cipher IV, hex
    pub iv: String,
    /// keccak256(derived_key[16:32] || ciphertext), hex
    pub mac: String,
    /// scrypt parameters used to derive the key
    #[serde(rename = "kdfparams")]
    pub params: KdfParams,
}

/// Byte form of the hex fields, checked for length
struct RecordBytes {
    ciphertext: Vec<u8>,
    iv: [u8; IV_LENGTH],
    mac: [u8; MAC_LENGTH],
}

impl KeystoreRecord {
    /// Encrypt a private key, see [`encrypt_private_key`]
    pub fn encrypt(
        private_key: &PrivateKey,
        password: &str,
        params: &KdfParams,
    ) -> KeystoreResult<Self> {
        encrypt_private_key(private_key, password, params)
    }

    /// Decrypt the private key, see [`decrypt_private_key`]
    pub fn decrypt(&self, password: &str) -> KeystoreResult<PrivateKey> {
        decrypt_private_key(self, password)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> KeystoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> KeystoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON; field contents are checked on decryption
    pub fn from_json(json: &str) -> KeystoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn decode(&self) -> KeystoreResult<RecordBytes> {
        let ciphertext = decode_field("ciphertext", &self.ciphertext)?;
        if ciphertext.len() != PRIVATE_KEY_LENGTH {
            return Err(KeystoreError::CorruptRecord(format!(
                "ciphertext must be {} bytes, got {}",
                PRIVATE_KEY_LENGTH,
                ciphertext.len()
            )));
        }
        let iv = decode_fixed::<IV_LENGTH>("iv", &self.iv)?;
        let mac = decode_fixed::<MAC_LENGTH>("mac", &self.mac)?;

        Ok(RecordBytes {
            ciphertext,
            iv,
            mac,
        })
    }
}

fn decode_field(name: &str, value: &str) -> KeystoreResult<Vec<u8>> {
    hex::decode(value)
        .map_err(|e| KeystoreError::CorruptRecord(format!("invalid {} hex: {}", name, e)))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> KeystoreResult<[u8; N]> {
    let bytes = decode_field(name, value)?;
    bytes.as_slice().try_into().map_err(|_| {
        KeystoreError::CorruptRecord(format!("{} must be {} bytes, got {}", name, N, bytes.len()))
    })
}

/// Encrypt a private key under a password.
///
/// 1. `dk = scrypt(password, salt, n, r, p, dklen)`
/// 2. `ciphertext = AES-128-CTR(dk[0:16], iv, private_key)` with a fresh random IV
/// 3. `mac = keccak256(dk[16:32] || ciphertext)`
///
/// Fails with `InvalidConfig` for unusable parameters (including `dklen < 32`)
/// and `EntropyFailure` when no IV can be sampled.
pub fn encrypt_private_key(
    private_key: &PrivateKey,
    password: &str,
    params: &KdfParams,
) -> KeystoreResult<KeystoreRecord> {
    encrypt_private_key_with_rng(private_key, password, params, &mut OsRng)
}

/// Same as [`encrypt_private_key`] with a caller-provided random source for the IV.
pub fn encrypt_private_key_with_rng<R: CryptoRng + RngCore>(
    private_key: &PrivateKey,
    password: &str,
    params: &KdfParams,
    rng: &mut R,
) -> KeystoreResult<KeystoreRecord> {
    params.validate()?;
    debug!(
        n = params.n,
        r = params.r,
        p = params.p,
        dklen = params.dklen,
        "Encrypting private key"
    );

    let derived_key = params.derive_key(password)?;
    let iv = generate_iv_with_rng(rng)?;

    let secret = private_key.to_bytes();
    let ciphertext = encrypt_secret(secret.as_slice(), derived_key.encryption_key(), &iv)?;
    let mac = derived_mac(&derived_key, &ciphertext);

    Ok(KeystoreRecord {
        ciphertext: hex::encode(&ciphertext),
        iv: hex::encode(iv),
        mac: hex::encode(mac),
        params: params.clone(),
    })
}

/// Decrypt a keystore record.
///
/// The MAC is checked before any decryption happens. Fails with
/// `WrongPassword` on MAC mismatch and `CorruptRecord` when the record's
/// fields or parameters are structurally invalid.
pub fn decrypt_private_key(record: &KeystoreRecord, password: &str) -> KeystoreResult<PrivateKey> {
    let bytes = record.decode()?;
    let derived_key = derive_for_record(record, password)?;

    if let Err(e) = verify_mac(&derived_key, &bytes.ciphertext, &bytes.mac) {
        warn!("Keystore MAC mismatch");
        return Err(e);
    }

    let plaintext = decrypt_secret(&bytes.ciphertext, derived_key.encryption_key(), &bytes.iv)?;
    let private_key = PrivateKey::from_bytes(plaintext.expose_secret()).map_err(|_| {
        KeystoreError::CorruptRecord("decrypted bytes are not a valid private key".to_string())
    })?;

    debug!(n = record.params.n, "Decrypted private key");
    Ok(private_key)
}

/// Decrypt a record and check that the key belongs to `expected`.
///
/// Fails with `AddressMismatch` when the recovered key derives a different
/// address.
pub fn decrypt_and_verify(
    record: &KeystoreRecord,
    password: &str,
    expected: &Address,
) -> KeystoreResult<PrivateKey> {
    let private_key = decrypt_private_key(record, password)?;
    let recovered = address_from_public_key(&private_key.public_key());

    if &recovered != expected {
        warn!(%expected, %recovered, "Decrypted key does not match expected address");
        return Err(KeystoreError::AddressMismatch {
            expected: expected.to_string(),
            actual: recovered.to_string(),
        });
    }
    Ok(private_key)
}

fn derive_for_record(record: &KeystoreRecord, password: &str) -> KeystoreResult<DerivedKey> {
    record.params.derive_key(password).map_err(|e| match e {
        KeystoreError::InvalidConfig(msg) => {
            KeystoreError::CorruptRecord(format!("invalid kdfparams: {}", msg))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::generate_private_key;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fast_params() -> KdfParams {
        KdfParams::with_salt(&[0x42; 32], 1024, 8, 1, 32)
    }

    fn key() -> PrivateKey {
        generate_private_key().unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let private_key = key();
        let record = encrypt_private_key(&private_key, "correct horse", &fast_params()).unwrap();

        assert_eq!(record.ciphertext.len(), 64);
        assert_eq!(record.iv.len(), 32);
        assert_eq!(record.mac.len(), 64);
        assert_eq!(record.params, fast_params());

        let decrypted = decrypt_private_key(&record, "correct horse").unwrap();
        assert_eq!(decrypted, private_key);
    }

    #[test]
    fn test_wrong_password_fails() {
        let record = encrypt_private_key(&key(), "correct", &fast_params()).unwrap();

        let result = decrypt_private_key(&record, "incorrect");
        assert!(matches!(result, Err(KeystoreError::WrongPassword)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let private_key = key();
        let record = encrypt_private_key(&private_key, "pw", &fast_params()).unwrap();

        let mut bytes = hex::decode(&record.ciphertext).unwrap();
        bytes[0] ^= 0x01;
        let tampered = KeystoreRecord {
            ciphertext: hex::encode(bytes),
            ..record
        };

        assert!(matches!(
            decrypt_private_key(&tampered, "pw"),
            Err(KeystoreError::WrongPassword)
        ));
    }

    #[test]
    fn test_tampered_mac_fails() {
        let record = encrypt_private_key(&key(), "pw", &fast_params()).unwrap();

        let mut bytes = hex::decode(&record.mac).unwrap();
        bytes[0] ^= 0x01;
        let tampered = KeystoreRecord {
            mac: hex::encode(bytes),
            ..record
        };

        assert!(matches!(
            decrypt_private_key(&tampered, "pw"),
            Err(KeystoreError::WrongPassword)
        ));
    }

    #[test]
    fn test_oversized_kdf_params_rejected() {
        // 128 * r * n would be 2^58 bytes
        let json = format!(
            r#"{{"ciphertext":"{}","iv":"{}","mac":"{}","kdfparams":{{"salt":"01","n":2147483648,"r":1048576,"p":1,"dklen":32}}}}"#,
            "00".repeat(32),
            "00".repeat(16),
            "00".repeat(32),
        );
        let hostile = KeystoreRecord::from_json(&json).unwrap();

        assert!(matches!(
            decrypt_private_key(&hostile, "pw"),
            Err(KeystoreError::CorruptRecord(_))
        ));

        // The same shape is a configuration error when encrypting
        assert!(matches!(
            encrypt_private_key(&key(), "pw", &hostile.params),
            Err(KeystoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_fresh_iv_per_encryption() {
        let private_key = key();
        let r1 = encrypt_private_key(&private_key, "pw", &fast_params()).unwrap();
        let r2 = encrypt_private_key(&private_key, "pw", &fast_params()).unwrap();

        assert_ne!(r1.iv, r2.iv);
        assert_ne!(r1.ciphertext, r2.ciphertext);
    }

    #[test]
    fn test_deterministic_with_seeded_rng() {
        let private_key = key();
        let r1 = encrypt_private_key_with_rng(
            &private_key,
            "pw",
            &fast_params(),
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap();
        let r2 = encrypt_private_key_with_rng(
            &private_key,
            "pw",
            &fast_params(),
            &mut StdRng::seed_from_u64(7),
        )
        .unwrap();

        assert_eq!(r1, r2);
    }

    #[test]
    fn test_short_dklen_rejected_at_encrypt() {
        let params = KdfParams::with_salt(&[0x42; 32], 1024, 8, 1, 16);
        let result = encrypt_private_key(&key(), "pw", &params);
        assert!(matches!(result, Err(KeystoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_structurally_invalid_records() {
        let record = encrypt_private_key(&key(), "pw", &fast_params()).unwrap();

        let bad_hex = KeystoreRecord {
            ciphertext: "zz".to_string(),
            ..record.clone()
        };
        let short_iv = KeystoreRecord {
            iv: "00".repeat(8),
            ..record.clone()
        };
        let short_mac = KeystoreRecord {
            mac: "00".repeat(31),
            ..record.clone()
        };
        let long_ciphertext = KeystoreRecord {
            ciphertext: "00".repeat(33),
            ..record.clone()
        };
        let mut bad_params = record.clone();
        bad_params.params.dklen = 16;
        let mut bad_n = record.clone();
        bad_n.params.n = 1000;

        for corrupt in [bad_hex, short_iv, short_mac, long_ciphertext, bad_params, bad_n] {
            assert!(
                matches!(
                    decrypt_private_key(&corrupt, "pw"),
                    Err(KeystoreError::CorruptRecord(_))
                ),
                "expected CorruptRecord for {:?}",
                corrupt
            );
        }
    }

    #[test]
    fn test_decrypt_and_verify() {
        let private_key = key();
        let address = address_from_public_key(&private_key.public_key());
        let record = encrypt_private_key(&private_key, "pw", &fast_params()).unwrap();

        let decrypted = decrypt_and_verify(&record, "pw", &address).unwrap();
        assert_eq!(decrypted, private_key);

        let other = address_from_public_key(&key().public_key());
        assert!(matches!(
            decrypt_and_verify(&record, "pw", &other),
            Err(KeystoreError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn test_json_wire_shape() {
        let record = encrypt_private_key(&key(), "pw", &fast_params()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();

        assert!(value["ciphertext"].is_string());
        assert!(value["iv"].is_string());
        assert!(value["mac"].is_string());
        assert_eq!(value["kdfparams"]["n"], 1024);
        assert_eq!(value["kdfparams"]["r"], 8);
        assert_eq!(value["kdfparams"]["p"], 1);
        assert_eq!(value["kdfparams"]["dklen"], 32);
        assert_eq!(value["kdfparams"]["salt"], hex::encode([0x42; 32]));
    }

    #[test]
    fn test_json_roundtrip_decrypts() {
        let private_key = key();
        let record = KeystoreRecord::encrypt(&private_key, "pw", &fast_params()).unwrap();

        let parsed = KeystoreRecord::from_json(&record.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.decrypt("pw").unwrap(), private_key);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            KeystoreRecord::from_json("{\"iv\": \"00\"}"),
            Err(KeystoreError::JsonError(_))
        ));
    }
}
