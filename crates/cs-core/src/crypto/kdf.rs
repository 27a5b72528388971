use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KdfError {
    #[error("invalid argon2 parameters: {0}")]
    InvalidParameter(String),

    #[error("argon2id derivation failed: {0}")]
    DerivationFailed(String),
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// memory cost in KiB
    pub mem_kib: u32,
    /// time cost (iterations)
    pub iters: u32,
    /// lanes
    pub parallelism: u32,
}

impl KdfParams {
    pub const fn new(mem_kib: u32, iters: u32, parallelism: u32) -> Self {
        Self {
            mem_kib,
            iters,
            parallelism,
        }
    }

    /// Smallest parameters argon2 accepts. Tests only.
    pub const fn insecure_fast() -> Self {
        Self::new(8, 1, 1)
    }
}

/// Fills `output` with Argon2id(password, salt) under `params`.
pub fn argon2id_derive(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
    output: &mut [u8],
) -> Result<(), KdfError> {
    let argon_params = Params::new(
        params.mem_kib,
        params.iters,
        params.parallelism,
        Some(output.len()),
    )
    .map_err(|e| KdfError::InvalidParameter(e.to_string()))?;

    Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params)
        .hash_password_into(password, salt, output)
        .map_err(|e| KdfError::DerivationFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic_and_salt_bound() {
        let params = KdfParams::insecure_fast();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        let mut c = [0u8; 32];

        argon2id_derive(b"pw", b"salt-aaaaaaaaaaaa", &params, &mut a).unwrap();
        argon2id_derive(b"pw", b"salt-aaaaaaaaaaaa", &params, &mut b).unwrap();
        argon2id_derive(b"pw", b"salt-bbbbbbbbbbbb", &params, &mut c).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn rejects_zero_iterations() {
        let mut out = [0u8; 32];
        let err = argon2id_derive(b"pw", b"salt-aaaaaaaaaaaa", &KdfParams::new(8, 0, 1), &mut out)
            .expect_err("zero iterations must fail");
        assert!(matches!(err, KdfError::InvalidParameter(_)));
    }
}
