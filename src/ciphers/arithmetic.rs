//! Ciphers that push letter indices through modular arithmetic.

use crate::alphabet::{ALPHABET_LEN, gcd, map_letters, mod_inverse};
use crate::error::{CipherError, Result};
use crate::params::ParamSpec;
use crate::registry::{CipherDescriptor, Registry};

use super::plain;

fn affine_inverse(a: i64) -> Result<i64> {
    mod_inverse(a, ALPHABET_LEN).ok_or_else(|| {
        CipherError::InvalidKey(format!("a={a} has no inverse modulo 26"))
    })
}

/// `y = (a*x + b) mod 26`. `a` must be coprime with 26.
pub fn affine(text: &str, a: i64, b: i64) -> Result<String> {
    affine_inverse(a)?;
    let (a, b) = (a.rem_euclid(ALPHABET_LEN), b.rem_euclid(ALPHABET_LEN));
    Ok(map_letters(text, |_, x| a * x + b))
}

/// `x = a^-1 * (y - b) mod 26`.
pub fn affine_decrypt(text: &str, a: i64, b: i64) -> Result<String> {
    let inv = affine_inverse(a)?;
    let b = b.rem_euclid(ALPHABET_LEN);
    Ok(map_letters(text, |_, y| inv * (y - b)))
}

pub fn multiplicative(text: &str, mult: i64) -> String {
    let mult = mult.rem_euclid(ALPHABET_LEN);
    map_letters(text, |_, x| x * mult)
}

pub fn additive_inverse(text: &str) -> String {
    map_letters(text, |_, x| ALPHABET_LEN - x)
}

fn mod_pow(base: i64, mut exp: u32, modulus: i64) -> i64 {
    let mut result = 1i64;
    let mut base = base.rem_euclid(modulus);
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % modulus;
        }
        base = base * base % modulus;
        exp >>= 1;
    }
    result % modulus
}

/// `(x + 1)^exp mod 26 - 1`.
pub fn exponential(text: &str, exp: i64) -> Result<String> {
    let exp = u32::try_from(exp)
        .map_err(|_| CipherError::InvalidParameter("exp must be a non-negative integer".into()))?;
    Ok(map_letters(text, |_, x| mod_pow(x + 1, exp, ALPHABET_LEN) - 1))
}

pub fn square(text: &str) -> String {
    map_letters(text, |_, x| x * x)
}

pub fn cubic(text: &str) -> String {
    map_letters(text, |_, x| x * x * x)
}

fn wave(x: i64, f: fn(f64) -> f64) -> i64 {
    (f(x as f64) * 13.0 + 13.0) as i64
}

pub fn sine(text: &str) -> String {
    map_letters(text, |_, x| wave(x, f64::sin))
}

pub fn cosine(text: &str) -> String {
    map_letters(text, |_, x| wave(x, f64::cos))
}

pub fn gcd_cipher(text: &str) -> String {
    map_letters(text, |_, x| gcd(x + 1, ALPHABET_LEN))
}

/// `lcm(x + 1, position + 1)`.
pub fn lcm_cipher(text: &str) -> String {
    map_letters(text, |pos, x| {
        let (a, b) = (x + 1, pos as i64 + 1);
        a / gcd(a, b) * b
    })
}

pub fn product_cipher(text: &str) -> String {
    map_letters(text, |pos, x| x * (pos as i64 + 1))
}

pub(crate) fn register(reg: &mut Registry) {
    reg.register(
        CipherDescriptor::new(
            "affine",
            "Affine Cipher",
            "Linear transformation (ax + b) mod 26. 'a' must be coprime with 26.",
            |t, p| affine(t, p.number_or("a", 5)?, p.number_or("b", 8)?),
        )
        .with_params(const { &[ParamSpec::number("a"), ParamSpec::number("b")] })
        .with_decrypt(|t, p| affine_decrypt(t, p.number_or("a", 5)?, p.number_or("b", 8)?)),
    );
    reg.register(
        CipherDescriptor::new(
            "multiplicative",
            "Multiplicative Cipher",
            "Multiply each letter index by a constant.",
            |t, p| Ok(multiplicative(t, p.number_or("mult", 3)?)),
        )
        .with_params(const { &[ParamSpec::number("mult")] }),
    );
    reg.register(
        CipherDescriptor::new(
            "exponential",
            "Exponential Cipher",
            "Raise each letter value to a power modulo 26.",
            |t, p| exponential(t, p.number_or("exp", 2)?),
        )
        .with_params(const { &[ParamSpec::number("exp")] }),
    );

    let fixed: [(&'static str, &'static str, &'static str, fn(&str) -> String); 8] = [
        ("additive-inverse", "Additive Inverse", "Replace each letter value with its additive inverse.", additive_inverse),
        ("square", "Square Cipher", "Square each letter value.", square),
        ("cubic", "Cubic Cipher", "Cube each letter value.", cubic),
        ("sine", "Sine Cipher", "Map letter values through a sine wave.", sine),
        ("cosine", "Cosine Cipher", "Map letter values through a cosine wave.", cosine),
        ("gcd", "GCD Cipher", "Replace each letter with gcd(value, 26).", gcd_cipher),
        ("lcm", "LCM Cipher", "Replace each letter with lcm(value, position).", lcm_cipher),
        ("product-cipher", "Product Cipher", "Multiply each letter by its position.", product_cipher),
    ];
    for (slug, name, description, f) in fixed {
        reg.register(CipherDescriptor::new(slug, name, description, plain(f)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affine_roundtrip() {
        let enc = affine("Affine cipher", 5, 8).unwrap();
        assert_eq!(enc, "IHHWVC SWFRCP");
        assert_eq!(affine_decrypt(&enc, 5, 8).unwrap(), "AFFINE CIPHER");
    }

    #[test]
    fn affine_rejects_non_coprime_a() {
        assert!(matches!(affine("abc", 13, 1), Err(CipherError::InvalidKey(_))));
        assert!(matches!(
            affine_decrypt("abc", 4, 1),
            Err(CipherError::InvalidKey(_))
        ));
    }

    #[test]
    fn exponential_matches_modpow() {
        // B -> (1+1)^2 - 1 = 3 -> D
        assert_eq!(exponential("B", 2).unwrap(), "D");
        assert_eq!(exponential("Z", 0).unwrap(), "A");
        assert!(exponential("A", -1).is_err());
    }

    #[test]
    fn waves_stay_in_range() {
        let all: String = ('A'..='Z').collect();
        assert!(sine(&all).chars().all(|c| c.is_ascii_uppercase()));
        assert!(cosine(&all).chars().all(|c| c.is_ascii_uppercase()));
        // cos(0) * 13 + 13 = 26 -> wraps to A
        assert_eq!(cosine("A"), "A");
    }

    #[test]
    fn positional_products() {
        assert_eq!(product_cipher("BBB"), "BCD");
        assert_eq!(lcm_cipher("BB"), "CC");
        assert_eq!(gcd_cipher("B M"), "C N");
    }
}
