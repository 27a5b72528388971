mod field_cipher;

pub use field_cipher::{XChaChaFieldCipher, FIELD_KDF_PARAMS};
