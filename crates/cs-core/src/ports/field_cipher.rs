use thiserror::Error;

use crate::security::SecretString;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldCipherError {
    #[error("key derivation failed: {0}")]
    KdfFailed(String),

    #[error("encryption failed: {0}")]
    EncryptFailed(String),

    /// Malformed input and wrong password are deliberately indistinguishable.
    #[error("decryption failed")]
    DecryptFailed,
}

/// Password-based encryption of single string fields.
///
/// The output of `encrypt` is printable text suitable for a TEXT column.
pub trait FieldCipherPort: Send + Sync {
    fn encrypt(&self, plaintext: &str, password: &SecretString) -> Result<String, FieldCipherError>;
    fn decrypt(&self, ciphertext: &str, password: &SecretString)
        -> Result<String, FieldCipherError>;
    /// Drops any key material cached since the last call.
    fn clear(&self);
}
