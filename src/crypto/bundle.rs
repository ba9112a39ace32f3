use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{CipherError, Result};

/// Base64 fields of one AES-GCM encryption. The GCM tag is the last
/// 16 bytes of the decoded ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AesBundle {
    pub salt_b64: String,
    pub nonce_b64: String,
    pub ciphertext_b64: String,
}

impl AesBundle {
    pub(crate) fn from_parts(salt: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            salt_b64: STANDARD.encode(salt),
            nonce_b64: STANDARD.encode(nonce),
            ciphertext_b64: STANDARD.encode(ciphertext),
        }
    }

    /// Decoded `(salt, nonce, ciphertext)`.
    pub(crate) fn decode(&self) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>)> {
        let decode = |field: &str| STANDARD.decode(field).map_err(|_| CipherError::Decryption);
        Ok((
            decode(&self.salt_b64)?,
            decode(&self.nonce_b64)?,
            decode(&self.ciphertext_b64)?,
        ))
    }

    /// Pretty-printed wire format.
    pub fn to_json(&self) -> String {
        // three String fields with string keys: serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Parses the wire format. Malformed JSON counts as a failed decryption.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|_| CipherError::Decryption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_has_exactly_three_fields() {
        let bundle = AesBundle::from_parts(b"salt", b"nonce", b"ct");
        let value: serde_json::Value = serde_json::from_str(&bundle.to_json()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["salt_b64"], "c2FsdA==");
        assert_eq!(obj["nonce_b64"], "bm9uY2U=");
        assert_eq!(obj["ciphertext_b64"], "Y3Q=");
    }

    #[test]
    fn from_json_roundtrip() {
        let bundle = AesBundle::from_parts(&[1; 16], &[2; 12], &[3; 20]);
        assert_eq!(AesBundle::from_json(&bundle.to_json()).unwrap(), bundle);
    }

    #[test]
    fn malformed_json_is_a_decryption_error() {
        assert!(matches!(
            AesBundle::from_json("{\"salt_b64\": 1}"),
            Err(CipherError::Decryption)
        ));
        assert!(matches!(AesBundle::from_json("nope"), Err(CipherError::Decryption)));
    }

    #[test]
    fn invalid_base64_fails_decode() {
        let mut bundle = AesBundle::from_parts(b"a", b"b", b"c");
        bundle.nonce_b64 = "***".into();
        assert!(matches!(bundle.decode(), Err(CipherError::Decryption)));
    }
}
