//! Classic text ciphers addressable by slug, plus password-based AES-256-GCM.
//!
//! ```
//! use cipherlab::{Params, encrypt_with_cipher, decrypt_with_cipher};
//!
//! let params = Params::new().with("key", "LEMON");
//! let ct = encrypt_with_cipher("vigenere", "ATTACKATDAWN", &params).unwrap();
//! assert_eq!(ct, "LXFOPVEFRNHR");
//! assert_eq!(decrypt_with_cipher("vigenere", &ct, &params).unwrap(), "ATTACKATDAWN");
//! ```

pub mod alphabet;
pub mod catalog;
pub mod ciphers;
pub mod crypto;
pub mod dynamic;
pub mod error;
pub mod params;
pub mod registry;
pub mod storage;

pub use crate::catalog::{CatalogEntry, Category, CipherAlias};
pub use crate::crypto::{AesBundle, KdfParams, aes_decrypt_with_kdf, aes_encrypt_with_kdf};
pub use crate::error::{CipherError, Result};
pub use crate::params::{ParamKind, ParamSpec, ParamValue, Params};
pub use crate::registry::{CipherDescriptor, Registry};
pub use crate::storage::Storage;

/// `true` if `slug` names a static cipher or a resolvable dynamic one.
pub fn cipher_exists(slug: &str) -> bool {
    registry::exists(slug)
}

pub fn get_cipher_info(slug: &str) -> Option<CipherDescriptor> {
    registry::lookup(slug)
}

/// Encrypts `text` with the cipher named by `slug`.
///
/// # Errors
///
/// [`CipherError::UnknownCipher`] for an unknown slug, otherwise whatever
/// the cipher reports for a bad key or parameter.
pub fn encrypt_with_cipher(slug: &str, text: &str, params: &Params) -> Result<String> {
    registry::encrypt(slug, text, params)
}

/// Decrypts `text` with the cipher named by `slug`.
///
/// # Errors
///
/// As [`encrypt_with_cipher`], plus [`CipherError::Unsupported`] for ciphers
/// that cannot be inverted.
pub fn decrypt_with_cipher(slug: &str, text: &str, params: &Params) -> Result<String> {
    registry::decrypt(slug, text, params)
}

/// Encrypts with the default scrypt cost. See [`aes_encrypt_with_kdf`].
pub fn aes_encrypt(plaintext: &str, password: &str) -> Result<AesBundle> {
    crypto::aes_encrypt(plaintext, password)
}

pub fn aes_decrypt(bundle: &AesBundle, password: &str) -> Result<String> {
    crypto::aes_decrypt(bundle, password)
}
