//!
//! Salted password hashing for the dataset credential record.
//!

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::kdf::{argon2id_derive, KdfError, KdfParams};

/// Current version of the encoded credential format.
pub const HASH_VERSION: u8 = 0x01;

/// Size of the salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Size of the hash output in bytes.
pub const HASH_SIZE: usize = 32;

/// Total size of the encoded record (version + params + salt + hash).
pub const ENCODED_SIZE: usize = 1 + 12 + SALT_SIZE + HASH_SIZE;

/// Fixed cost for new credentials: 19 MiB, 2 passes, 1 lane.
pub const CREDENTIAL_KDF_PARAMS: KdfParams = KdfParams::new(19 * 1024, 2, 1);

/// Upper bounds for parameters read back from a stored record. A record
/// above any of them is rejected as malformed before Argon2 allocates.
pub const MAX_MEM_KIB: u32 = 1024 * 1024;
pub const MAX_ITERS: u32 = 64;
pub const MAX_PARALLELISM: u32 = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    HashingFailed(#[from] KdfError),

    #[error("malformed credential record: {0}")]
    MalformedRecord(String),
}

/// Encoded credential as stored in the dataset (base64 text).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn from_stored(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct EncodedCredential {
    version: u8,
    params: KdfParams,
    salt: [u8; SALT_SIZE],
    hash: [u8; HASH_SIZE],
}

impl EncodedCredential {
    fn encode(&self) -> PasswordHash {
        let mut encoded = Vec::with_capacity(ENCODED_SIZE);
        encoded.push(self.version);
        encoded.extend_from_slice(&self.params.mem_kib.to_be_bytes());
        encoded.extend_from_slice(&self.params.iters.to_be_bytes());
        encoded.extend_from_slice(&self.params.parallelism.to_be_bytes());
        encoded.extend_from_slice(&self.salt);
        encoded.extend_from_slice(&self.hash);
        PasswordHash(STANDARD.encode(encoded))
    }

    fn decode(stored: &PasswordHash) -> Result<Self, CredentialError> {
        let encoded = STANDARD
            .decode(stored.as_str())
            .map_err(|e| CredentialError::MalformedRecord(e.to_string()))?;

        if encoded.len() != ENCODED_SIZE {
            return Err(CredentialError::MalformedRecord(format!(
                "invalid length: expected {}, got {}",
                ENCODED_SIZE,
                encoded.len()
            )));
        }
        let version = encoded[0];
        if version != HASH_VERSION {
            return Err(CredentialError::MalformedRecord(format!(
                "unsupported version: {} (supported: {})",
                version, HASH_VERSION
            )));
        }

        let word = |at: usize| {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&encoded[at..at + 4]);
            u32::from_be_bytes(buf)
        };
        let params = KdfParams::new(word(1), word(5), word(9));
        if params.mem_kib > MAX_MEM_KIB
            || params.iters > MAX_ITERS
            || params.parallelism > MAX_PARALLELISM
        {
            return Err(CredentialError::MalformedRecord(format!(
                "cost parameters out of range: {} KiB, {} passes, {} lanes",
                params.mem_kib, params.iters, params.parallelism
            )));
        }

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&encoded[13..13 + SALT_SIZE]);

        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(&encoded[13 + SALT_SIZE..]);

        Ok(Self {
            version,
            params,
            salt,
            hash,
        })
    }
}

/// Derives and verifies the password hash that guards a dataset.
#[derive(Debug, Clone)]
pub struct CredentialGuard {
    params: KdfParams,
}

impl Default for CredentialGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialGuard {
    pub fn new() -> Self {
        Self::with_params(CREDENTIAL_KDF_PARAMS)
    }

    /// Uses custom cost parameters for new hashes. Verification always uses
    /// the parameters stored in the record.
    pub fn with_params(params: KdfParams) -> Self {
        Self { params }
    }

    /// Hashes `password` with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<PasswordHash, CredentialError> {
        let salt = generate_salt();
        let hash = derive(password, &salt, &self.params)?;

        Ok(EncodedCredential {
            version: HASH_VERSION,
            params: self.params,
            salt,
            hash,
        }
        .encode())
    }

    /// Checks `password` against a stored record in constant time.
    ///
    /// A wrong password is `Ok(false)`; only an unreadable record is an error.
    pub fn verify(&self, password: &str, stored: &PasswordHash) -> Result<bool, CredentialError> {
        let decoded = EncodedCredential::decode(stored)?;
        let computed = derive(password, &decoded.salt, &decoded.params)?;
        Ok(computed.ct_eq(&decoded.hash).into())
    }
}

fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    rand::rng().fill_bytes(&mut salt);
    salt
}

fn derive(
    password: &str,
    salt: &[u8; SALT_SIZE],
    params: &KdfParams,
) -> Result<[u8; HASH_SIZE], CredentialError> {
    let mut output = [0u8; HASH_SIZE];
    argon2id_derive(password.as_bytes(), salt, params, &mut output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> CredentialGuard {
        CredentialGuard::with_params(KdfParams::insecure_fast())
    }

    #[test]
    fn verify_accepts_matching_password() {
        let stored = guard().hash_password("pw1").expect("hash password");
        assert!(guard().verify("pw1", &stored).expect("verify"));
    }

    #[test]
    fn verify_rejects_other_password() {
        let stored = guard().hash_password("pw1").expect("hash password");
        assert!(!guard().verify("pw2", &stored).expect("verify"));
        assert!(!guard().verify("", &stored).expect("verify"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = guard().hash_password("pw1").unwrap();
        let b = guard().hash_password("pw1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_uses_stored_parameters() {
        let stored = guard().hash_password("pw1").unwrap();
        // a guard configured with the production cost still verifies a cheap record
        assert!(CredentialGuard::new().verify("pw1", &stored).unwrap());
    }

    #[test]
    fn malformed_record_is_an_error() {
        let err = guard()
            .verify("pw1", &PasswordHash::from_stored("not base64 !".into()))
            .expect_err("garbage must not verify");
        assert!(matches!(err, CredentialError::MalformedRecord(_)));

        let short = PasswordHash::from_stored(STANDARD.encode([HASH_VERSION; 10]));
        assert!(matches!(
            guard().verify("pw1", &short),
            Err(CredentialError::MalformedRecord(_))
        ));
    }

    fn record_with(params: KdfParams) -> PasswordHash {
        EncodedCredential {
            version: HASH_VERSION,
            params,
            salt: [7; SALT_SIZE],
            hash: [9; HASH_SIZE],
        }
        .encode()
    }

    #[test]
    fn oversized_cost_parameters_are_malformed() {
        for params in [
            KdfParams::new(u32::MAX, 1, 1),
            KdfParams::new(MAX_MEM_KIB + 1, 1, 1),
            KdfParams::new(8, MAX_ITERS + 1, 1),
            KdfParams::new(8, 1, MAX_PARALLELISM + 1),
        ] {
            assert!(matches!(
                guard().verify("pw", &record_with(params)),
                Err(CredentialError::MalformedRecord(_))
            ));
        }
    }

    #[test]
    fn production_cost_is_within_bounds() {
        let record = record_with(CREDENTIAL_KDF_PARAMS);
        assert_eq!(
            EncodedCredential::decode(&record).unwrap().params,
            CREDENTIAL_KDF_PARAMS
        );
    }

    #[test]
    fn encoded_record_has_expected_length() {
        let stored = guard().hash_password("pw1").unwrap();
        let raw = STANDARD.decode(stored.as_str()).unwrap();
        assert_eq!(raw.len(), ENCODED_SIZE);
        assert_eq!(raw[0], HASH_VERSION);
    }
}
