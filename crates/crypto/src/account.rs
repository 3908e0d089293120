//! Account bundle: a private key with its public key and address

use crate::address::{address_from_public_key, Address};
use crate::error::CryptoResult;
use crate::keypair::{derive_public_key, generate_private_key, PrivateKey, PublicKey};

/// A freshly generated or imported account
#[derive(Clone)]
pub struct Account {
    private_key: PrivateKey,
    public_key: PublicKey,
    address: Address,
}

impl Account {
    /// Generate a new random account
    pub fn generate() -> CryptoResult<Self> {
        Ok(Self::from_private_key(generate_private_key()?))
    }

    /// Build the account for an existing private key
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = derive_public_key(&private_key);
        let address = address_from_public_key(&public_key);
        Self {
            private_key,
            public_key,
            address,
        }
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish()
    }
}
