use anyhow::{Context, Result};
use zeroize::Zeroizing;

use super::KEY_LEN;

/// Scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    log_n: u8,
    r: u32,
    p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            // N = 2^14
            log_n: 14,
            // block size
            r: 8,
            // parallelism
            p: 1,
        }
    }
}

impl KdfParams {
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self> {
        let params = Self { log_n, r, p };
        params.validate()?;
        Ok(params)
    }

    pub fn log_n(&self) -> u8 {
        self.log_n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_n < 1 {
            anyhow::bail!("scrypt log_n must be >= 1");
        }
        if self.log_n > 20 {
            anyhow::bail!("scrypt log_n must be <= 20");
        }
        if self.r < 1 {
            anyhow::bail!("scrypt r must be >= 1");
        }
        if self.p < 1 {
            anyhow::bail!("scrypt p must be >= 1");
        }
        if u64::from(self.r) * u64::from(self.p) >= 1 << 30 {
            anyhow::bail!("scrypt r * p must be < 2^30");
        }
        Ok(())
    }
}

pub fn derive_key(password: &str, salt: &[u8], kdf: KdfParams) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    kdf.validate().context("invalid scrypt parameters")?;

    let params = scrypt::Params::new(kdf.log_n, kdf.r, kdf.p, KEY_LEN)
        .map_err(|e| anyhow::anyhow!("failed to construct scrypt params: {e}"))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    scrypt::scrypt(password.as_bytes(), salt, &params, &mut key[..])
        .map_err(|e| anyhow::anyhow!("scrypt key derivation failed: {e}"))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> KdfParams {
        KdfParams::new(10, 8, 1).unwrap()
    }

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; 16];

        let k1 = derive_key("password", &salt, fast()).unwrap();
        let k2 = derive_key("password", &salt, fast()).unwrap();

        assert_eq!(*k1, *k2);
    }

    #[test]
    fn kdf_params_affect_output() {
        let salt = [7u8; 16];

        let k1 = derive_key("pw", &salt, KdfParams::new(10, 8, 1).unwrap()).unwrap();
        let k2 = derive_key("pw", &salt, KdfParams::new(11, 8, 1).unwrap()).unwrap();

        assert_ne!(*k1, *k2);
    }

    #[test]
    fn salt_affects_output() {
        let k1 = derive_key("pw", &[1u8; 16], fast()).unwrap();
        let k2 = derive_key("pw", &[2u8; 16], fast()).unwrap();

        assert_ne!(*k1, *k2);
    }

    #[test]
    fn known_scrypt_vector() {
        // RFC 7914 section 12, second vector, truncated to 32 bytes.
        let kdf = KdfParams::new(10, 8, 16).unwrap();
        let key = derive_key("password", b"NaCl", kdf).unwrap();
        assert_eq!(
            key[..8],
            [0xfd, 0xba, 0xbe, 0x1c, 0x9d, 0x34, 0x72, 0x00]
        );
    }

    #[test]
    fn kdf_invalid_params_fail_gracefully() {
        assert!(KdfParams::new(0, 8, 1).is_err());
        assert!(KdfParams::new(14, 0, 1).is_err());
        assert!(KdfParams::new(14, 8, 0).is_err());
        assert!(KdfParams::new(40, 8, 1).is_err());
    }

    #[test]
    fn default_matches_interoperable_format() {
        let kdf = KdfParams::default();
        assert_eq!((kdf.log_n(), kdf.r(), kdf.p()), (14, 8, 1));
        assert!(kdf.validate().is_ok());
    }
}
