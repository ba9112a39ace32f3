//! Password-based AES-256-GCM.
//!
//! A fresh salt feeds scrypt to derive the key; a fresh nonce feeds
//! AES-GCM. Everything needed to decrypt except the password travels in an
//! [`AesBundle`].

pub mod aead;
pub mod bundle;
pub mod kdf;

pub use aead::{decrypt, encrypt, generate_salt};
pub use bundle::AesBundle;
pub use kdf::{KdfParams, derive_key};

use tracing::debug;

use crate::error::{CipherError, Result};

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the nonce (12 bytes for AES-GCM).
pub const NONCE_LEN: usize = 12;
/// Length of the encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;
/// Shortest password accepted for encryption, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn aes_encrypt(plaintext: &str, password: &str) -> Result<AesBundle> {
    aes_encrypt_with_kdf(plaintext, password, KdfParams::default())
}

pub fn aes_encrypt_with_kdf(plaintext: &str, password: &str, kdf: KdfParams) -> Result<AesBundle> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CipherError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }
    kdf.validate()
        .map_err(|e| CipherError::InvalidParameter(e.to_string()))?;

    let salt = generate_salt().map_err(|e| CipherError::Encryption(e.to_string()))?;
    let key =
        derive_key(password, &salt, kdf).map_err(|e| CipherError::Encryption(format!("{e:#}")))?;
    let (ciphertext, nonce) =
        encrypt(&*key, plaintext.as_bytes()).map_err(|e| CipherError::Encryption(e.to_string()))?;

    debug!(
        log_n = kdf.log_n(),
        len = plaintext.len(),
        "aes-gcm encryption complete"
    );
    Ok(AesBundle::from_parts(&salt, &nonce, &ciphertext))
}

pub fn aes_decrypt(bundle: &AesBundle, password: &str) -> Result<String> {
    aes_decrypt_with_kdf(bundle, password, KdfParams::default())
}

/// Every failure, from bad base64 to a wrong password, is reported as
/// [`CipherError::Decryption`].
pub fn aes_decrypt_with_kdf(bundle: &AesBundle, password: &str, kdf: KdfParams) -> Result<String> {
    let (salt, nonce, ciphertext) = bundle.decode()?;
    if salt.len() != SALT_LEN || nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(CipherError::Decryption);
    }
    let key = derive_key(password, &salt, kdf).map_err(|_| CipherError::Decryption)?;
    let plaintext = decrypt(&*key, &nonce, &ciphertext).map_err(|_| CipherError::Decryption)?;
    let text = std::str::from_utf8(&plaintext).map_err(|_| CipherError::Decryption)?;
    Ok(text.to_string())
}
