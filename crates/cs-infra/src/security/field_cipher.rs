use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::{KeyInit, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use tracing::debug;
use zeroize::Zeroizing;

use cs_core::crypto::{argon2id_derive, KdfParams};
use cs_core::ports::{FieldCipherError, FieldCipherPort};
use cs_core::security::SecretString;

const FORMAT_VERSION: u8 = 0x01;
const SALT_SIZE: usize = 16;
const NONCE_SIZE: usize = 24;
const TAG_SIZE: usize = 16;
const KEY_SIZE: usize = 32;
const HEADER_SIZE: usize = 1 + SALT_SIZE + NONCE_SIZE;

/// Argon2id cost for field keys.
pub const FIELD_KDF_PARAMS: KdfParams = KdfParams::new(19 * 1024, 2, 1);

type Fingerprint = [u8; 32];
type Salt = [u8; SALT_SIZE];
type FieldKey = Zeroizing<[u8; KEY_SIZE]>;

#[derive(Default)]
struct KeyCache {
    /// Salt used for new ciphertexts, one per password.
    encrypt_salts: HashMap<Fingerprint, Salt>,
    keys: HashMap<(Fingerprint, Salt), FieldKey>,
}

/// Field cipher: Argon2id key derivation and XChaCha20-Poly1305.
///
/// Each ciphertext is `base64(version | salt | nonce | ciphertext+tag)` with
/// the version byte bound as associated data. Derived keys are cached per
/// (password, salt) until [`FieldCipherPort::clear`], so one pipeline run pays
/// for key derivation once per salt instead of once per field.
pub struct XChaChaFieldCipher {
    params: KdfParams,
    /// Random key for password fingerprints, so the cache never holds an
    /// unkeyed hash of a password.
    fingerprint_key: Zeroizing<[u8; 32]>,
    cache: Mutex<KeyCache>,
}

impl Default for XChaChaFieldCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl XChaChaFieldCipher {
    pub fn new() -> Self {
        Self::with_params(FIELD_KDF_PARAMS)
    }

    pub fn with_params(params: KdfParams) -> Self {
        let mut fingerprint_key = Zeroizing::new([0u8; 32]);
        rand::rng().fill_bytes(&mut fingerprint_key[..]);
        Self {
            params,
            fingerprint_key,
            cache: Mutex::new(KeyCache::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, KeyCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fingerprint(&self, password: &SecretString) -> Fingerprint {
        *blake3::keyed_hash(&self.fingerprint_key, password.expose().as_bytes()).as_bytes()
    }

    fn key_for(
        &self,
        cache: &mut KeyCache,
        fingerprint: Fingerprint,
        password: &SecretString,
        salt: &Salt,
    ) -> Result<XChaCha20Poly1305, FieldCipherError> {
        let key = match cache.keys.entry((fingerprint, *salt)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut key: FieldKey = Zeroizing::new([0u8; KEY_SIZE]);
                argon2id_derive(password.expose().as_bytes(), salt, &self.params, &mut key[..])
                    .map_err(|e| FieldCipherError::KdfFailed(e.to_string()))?;
                entry.insert(key)
            }
        };
        XChaCha20Poly1305::new_from_slice(&key[..])
            .map_err(|e| FieldCipherError::KdfFailed(e.to_string()))
    }
}

impl FieldCipherPort for XChaChaFieldCipher {
    fn encrypt(&self, plaintext: &str, password: &SecretString) -> Result<String, FieldCipherError> {
        let fingerprint = self.fingerprint(password);
        let mut cache = self.lock();

        let salt = *cache.encrypt_salts.entry(fingerprint).or_insert_with(|| {
            let mut salt = [0u8; SALT_SIZE];
            rand::rng().fill_bytes(&mut salt);
            salt
        });
        let cipher = self.key_for(&mut cache, fingerprint, password, &salt)?;
        drop(cache);

        let mut nonce = [0u8; NONCE_SIZE];
        rand::rng().fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: &[FORMAT_VERSION],
                },
            )
            .map_err(|e| FieldCipherError::EncryptFailed(e.to_string()))?;

        let mut out = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
        out.push(FORMAT_VERSION);
        out.extend_from_slice(&salt);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(out))
    }

    fn decrypt(
        &self,
        ciphertext: &str,
        password: &SecretString,
    ) -> Result<String, FieldCipherError> {
        let raw = STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| FieldCipherError::DecryptFailed)?;
        if raw.len() < HEADER_SIZE + TAG_SIZE || raw[0] != FORMAT_VERSION {
            return Err(FieldCipherError::DecryptFailed);
        }

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&raw[1..1 + SALT_SIZE]);
        let nonce = XNonce::from_slice(&raw[1 + SALT_SIZE..HEADER_SIZE]);

        let fingerprint = self.fingerprint(password);
        let cipher = {
            let mut cache = self.lock();
            self.key_for(&mut cache, fingerprint, password, &salt)?
        };

        let plaintext = cipher
            .decrypt(
                nonce,
                Payload {
                    msg: &raw[HEADER_SIZE..],
                    aad: &[FORMAT_VERSION],
                },
            )
            .map_err(|_| FieldCipherError::DecryptFailed)?;

        String::from_utf8(plaintext).map_err(|_| FieldCipherError::DecryptFailed)
    }

    fn clear(&self) {
        let mut cache = self.lock();
        let cached = cache.keys.len();
        *cache = KeyCache::default();
        debug!(cached, "field key cache cleared");
    }
}
