use super::{NONCE_LEN, SALT_LEN};
use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use anyhow::{Result, anyhow};
use getrandom::fill;
use zeroize::Zeroizing;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| anyhow!("OS random generator unavailable"))
}

/// Generate salt
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// Encrypt plaintext; the returned ciphertext ends with the 16-byte tag.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN])> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let mut nonce = [0u8; NONCE_LEN];
    secure_random(&mut nonce)?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| anyhow!("encryption failed"))?;

    Ok((ciphertext, nonce))
}

/// Decrypt ciphertext
pub fn decrypt(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if nonce.len() != NONCE_LEN {
        return Err(anyhow!("nonce must be {NONCE_LEN} bytes"));
    }
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| anyhow!("Invalid password or corrupted data"))?;
    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{KEY_LEN, TAG_LEN};

    #[test]
    fn roundtrip_and_tag_length() {
        let key = [9u8; KEY_LEN];
        let (ciphertext, nonce) = encrypt(&key, b"attack at dawn").unwrap();
        assert_eq!(ciphertext.len(), 14 + TAG_LEN);

        let plaintext = decrypt(&key, &nonce, &ciphertext).unwrap();
        assert_eq!(&plaintext[..], b"attack at dawn");
    }

    #[test]
    fn fresh_nonce_per_call() {
        let key = [1u8; KEY_LEN];
        let (c1, n1) = encrypt(&key, b"same").unwrap();
        let (c2, n2) = encrypt(&key, b"same").unwrap();
        assert_ne!(n1, n2);
        assert_ne!(c1, c2);
    }

    #[test]
    fn tampering_is_detected() {
        let key = [3u8; KEY_LEN];
        let (mut ciphertext, nonce) = encrypt(&key, b"payload").unwrap();
        ciphertext[0] ^= 1;
        assert!(decrypt(&key, &nonce, &ciphertext).is_err());
    }

    #[test]
    fn wrong_key_or_nonce_fails() {
        let (ciphertext, nonce) = encrypt(&[5u8; KEY_LEN], b"payload").unwrap();
        assert!(decrypt(&[6u8; KEY_LEN], &nonce, &ciphertext).is_err());
        assert!(decrypt(&[5u8; KEY_LEN], &nonce[..8], &ciphertext).is_err());
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
