//! Secret memory wrappers for derived keys and decrypted key bytes
//!
//! Thin layer over the `secrecy` crate: the wrapped buffer is zeroized on
//! drop and only reachable through `expose_secret()`.

use secrecy::SecretBox;

/// A secret byte buffer that is zeroized on drop.
///
/// # Example
///
/// ```rust
/// use ledgerid_crypto::secure::{IntoSecret, SecretBytes};
/// use secrecy::ExposeSecret;
///
/// let secret: SecretBytes = vec![1, 2, 3, 4].into_secret();
/// assert_eq!(secret.expose_secret(), &vec![1, 2, 3, 4]);
/// ```
pub type SecretBytes = SecretBox<Vec<u8>>;

/// Extension trait for moving a buffer into secret storage.
pub trait IntoSecret {
    /// The secret type this converts into.
    type Secret;

    /// Convert into a secret value.
    fn into_secret(self) -> Self::Secret;
}

impl IntoSecret for Vec<u8> {
    type Secret = SecretBytes;

    fn into_secret(self) -> Self::Secret {
        SecretBox::new(Box::new(self))
    }
}
