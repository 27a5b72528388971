//! Cryptographic utilities
//!
//! - **KDF**: Argon2id parameters and key derivation shared by the credential
//!   hash and the field cipher
//! - **Credential**: salted, slow password hash guarding an exported dataset

pub mod credential;
pub mod kdf;

pub use credential::{CredentialError, CredentialGuard, PasswordHash, CREDENTIAL_KDF_PARAMS};
pub use kdf::{argon2id_derive, KdfError, KdfParams};
