use thiserror::Error;

/// Failure kinds surfaced by cipher dispatch and the AES module.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("unknown cipher: {0}")]
    UnknownCipher(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Wrong password, tampered ciphertext and malformed bundles all land here.
    #[error("decryption failed: wrong password or corrupted data")]
    Decryption,

    #[error("decryption is not supported for cipher '{0}'")]
    Unsupported(String),

    #[error("encryption failed: {0}")]
    Encryption(String),
}

impl CipherError {
    /// `true` when the cipher simply has no inverse, as opposed to a real failure.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CipherError::Unsupported(_))
    }
}

pub type Result<T, E = CipherError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_is_distinguishable() {
        assert!(CipherError::Unsupported("morse".into()).is_unsupported());
        assert!(!CipherError::Decryption.is_unsupported());
        assert!(!CipherError::InvalidKey("x".into()).is_unsupported());
    }

    #[test]
    fn messages_name_the_offender() {
        let err = CipherError::UnknownCipher("nope".into());
        assert_eq!(err.to_string(), "unknown cipher: nope");

        let err = CipherError::WeakPassword { min: 6 };
        assert_eq!(err.to_string(), "password must be at least 6 characters");
    }
}
