//! Property-based tests for address derivation and keystore round trips
//!
//! Uses proptest to verify invariants across many randomly generated inputs.

use ledgerid_crypto::{
    address_from_hash, address_from_public_key, address_to_hash, decrypt_private_key,
    derive_public_key, encrypt_private_key, hash, CryptoError, KdfParams, KeystoreError,
    PrivateKey,
};
use proptest::prelude::*;

fn fast_params(salt: &[u8]) -> KdfParams {
    KdfParams::with_salt(salt, 1 << 10, 8, 1, 32)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: the address decodes to RIPEMD160(SHA256(pubkey))
    #[test]
    fn prop_address_decodes_to_hash160(seed in any::<[u8; 32]>()) {
        // Out-of-range scalars are vanishingly rare; skip them
        prop_assume!(PrivateKey::from_bytes(&seed).is_ok());
        let private_key = PrivateKey::from_bytes(&seed).unwrap();
        let public_key = derive_public_key(&private_key);

        let address = address_from_public_key(&public_key);
        let decoded = address_to_hash(address.as_str()).unwrap();
        prop_assert_eq!(decoded.as_bytes(), &hash::hash160(public_key.as_bytes()));
    }

    /// Property: public keys are always 65 bytes with the 0x04 tag
    #[test]
    fn prop_public_key_fixed_width(seed in any::<[u8; 32]>()) {
        prop_assume!(PrivateKey::from_bytes(&seed).is_ok());
        let public_key = derive_public_key(&PrivateKey::from_bytes(&seed).unwrap());

        prop_assert_eq!(public_key.as_bytes().len(), 65);
        prop_assert_eq!(public_key.as_bytes()[0], 0x04);
    }

    /// Property: hash -> address -> hash is the identity
    #[test]
    fn prop_hash_address_roundtrip(hash in any::<[u8; 20]>()) {
        let address = address_from_hash(&hash).unwrap();
        let decoded = address_to_hash(address.as_str()).unwrap();
        prop_assert_eq!(decoded.as_bytes(), &hash);
        prop_assert_eq!(address_from_hash(decoded.as_bytes()).unwrap(), address);
    }

    /// Property: altering any single character breaks the checksum
    #[test]
    fn prop_single_character_change_detected(
        hash in any::<[u8; 20]>(),
        position in any::<prop::sample::Index>(),
        replacement in prop::sample::select(
            "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz".chars().collect::<Vec<_>>()
        ),
    ) {
        let address = address_from_hash(&hash).unwrap();
        let mut chars: Vec<char> = address.as_str().chars().collect();
        let idx = position.index(chars.len());
        prop_assume!(chars[idx] != replacement);
        chars[idx] = replacement;
        let altered: String = chars.into_iter().collect();

        prop_assert!(address_to_hash(&altered).is_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))] // Reduced cases due to slow scrypt

    /// Property: decrypt(encrypt(k, pw), pw) == k
    #[test]
    fn prop_keystore_roundtrip(
        seed in any::<[u8; 32]>(),
        password in ".{0,32}",
        salt in any::<[u8; 16]>(),
    ) {
        prop_assume!(PrivateKey::from_bytes(&seed).is_ok());
        let private_key = PrivateKey::from_bytes(&seed).unwrap();

        let record = encrypt_private_key(&private_key, &password, &fast_params(&salt)).unwrap();
        prop_assert_eq!(decrypt_private_key(&record, &password).unwrap(), private_key);
    }

    /// Property: any other password fails with WrongPassword
    #[test]
    fn prop_wrong_password_rejected(
        password in "[a-z]{1,16}",
        other in "[a-z]{1,16}",
    ) {
        prop_assume!(password != other);
        let private_key = PrivateKey::from_bytes(&[0x11; 32]).unwrap();

        let record = encrypt_private_key(&private_key, &password, &fast_params(&[7; 16])).unwrap();
        prop_assert!(matches!(
            decrypt_private_key(&record, &other),
            Err(KeystoreError::WrongPassword)
        ));
    }
}

#[test]
fn test_altered_character_reports_checksum() {
    let address = address_from_hash(&[0x33; 20]).unwrap();
    let mut chars: Vec<char> = address.as_str().chars().collect();
    let last = chars.len() - 1;
    chars[last] = if chars[last] == 'z' { 'y' } else { 'z' };
    let altered: String = chars.into_iter().collect();

    assert_eq!(address_to_hash(&altered), Err(CryptoError::InvalidChecksum));
}
