//! Shift ciphers: fixed, positional and keyboard-order offsets, plus the
//! byte-level XOR and ROT47 toys.

use crate::alphabet::{ALPHABET_LEN, canonicalize, index_letter, letter_index, map_letters};
use crate::error::{CipherError, Result};
use crate::params::ParamSpec;
use crate::registry::{CipherDescriptor, Registry};

use super::plain;

const QWERTY: &[u8; 26] = b"QWERTYUIOPASDFGHJKLZXCVBNM";

pub fn caesar(text: &str, shift: i64) -> String {
    let shift = shift.rem_euclid(ALPHABET_LEN);
    map_letters(text, |_, x| x + shift)
}

pub fn caesar_decrypt(text: &str, shift: i64) -> String {
    caesar(text, unshift(shift))
}

/// Inverse shift, reduced first so any `i64` is safe to negate.
fn unshift(shift: i64) -> i64 {
    ALPHABET_LEN - shift.rem_euclid(ALPHABET_LEN)
}

pub fn rot13(text: &str) -> String {
    caesar(text, 13)
}

/// `A<->Z`, `B<->Y`, ...
pub fn atbash(text: &str) -> String {
    map_letters(text, |_, x| 25 - x)
}

pub fn atbash_shifted(text: &str, shift: i64) -> String {
    caesar(&atbash(text), shift)
}

/// Undoes [`atbash_shifted`]: unshift, then mirror.
pub fn atbash_shifted_decrypt(text: &str, shift: i64) -> String {
    atbash(&caesar(text, unshift(shift)))
}

fn qwerty_offset(ch: char, shift: i64) -> Option<u8> {
    if !ch.is_ascii() {
        return None;
    }
    let upper = ch.to_ascii_uppercase() as u8;
    let pos = QWERTY.iter().position(|&k| k == upper)? as i64;
    Some(QWERTY[(pos + shift.rem_euclid(26)) as usize % 26])
}

/// Moves each letter `shift` keys along the QWERTY letter rows.
pub fn keyboard_shift(text: &str, shift: i64) -> String {
    canonicalize(text)
        .chars()
        .map(|ch| match qwerty_offset(ch, shift) {
            Some(b) => b as char,
            None => ch,
        })
        .collect()
}

/// Lowercase flavour of [`keyboard_shift`] with a configurable offset.
pub fn keyboard_qwerty(text: &str, offset: i64) -> String {
    text.to_lowercase()
        .chars()
        .map(|ch| match qwerty_offset(ch, offset) {
            Some(b) => (b as char).to_ascii_lowercase(),
            None => ch,
        })
        .collect()
}

pub fn progressive_shift(text: &str) -> String {
    map_letters(text, |pos, x| x + pos as i64 + 1)
}

pub fn sum_cipher(text: &str) -> String {
    map_letters(text, |pos, x| x + pos as i64)
}

pub fn alternating_shift(text: &str, shift1: i64, shift2: i64) -> String {
    let (shift1, shift2) = (shift1.rem_euclid(ALPHABET_LEN), shift2.rem_euclid(ALPHABET_LEN));
    map_letters(text, |pos, x| if pos % 2 == 0 { x + shift1 } else { x + shift2 })
}

/// Shifts only the first letter of every whitespace-separated word.
/// Words are re-joined with single spaces.
pub fn word_shift(text: &str, shift: i64) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) if first.is_alphabetic() => {
                    let mut out = caesar(&first.to_string(), shift);
                    out.push_str(chars.as_str());
                    out
                }
                _ => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn rotating_rotor(text: &str, rotors: i64) -> Result<String> {
    if rotors < 1 {
        return Err(CipherError::InvalidParameter(
            "rotors must be at least 1".into(),
        ));
    }
    Ok(map_letters(text, |pos, x| x + (pos as i64 % rotors) + 1))
}

/// Two stepping "rotors": one advancing every letter, one cycling every five.
pub fn enigma_simple(text: &str) -> String {
    map_letters(text, |pos, x| {
        let pos = pos as i64;
        x + (pos % 26 + 1 + pos % 5)
    })
}

/// ROT47 over the printable ASCII range `!`..=`~`.
pub fn rot47(text: &str) -> String {
    text.chars()
        .map(|ch| match ch as u32 {
            c @ 33..=126 => char::from(33 + ((c - 33 + 47) % 94) as u8),
            _ => ch,
        })
        .collect()
}

fn xor_char(ch: char, key: u32) -> char {
    // Only the low byte flips, so the result stays a valid scalar value.
    char::from_u32(ch as u32 ^ key).unwrap_or(ch)
}

/// XORs every code point with `key mod 256`.
pub fn xor(text: &str, key: i64) -> String {
    let key = key.rem_euclid(256) as u32;
    text.chars().map(|ch| xor_char(ch, key)).collect()
}

/// XOR with the UTF-8 bytes of `key`, cycled per character.
pub fn xor_extended(text: &str, key: &str) -> Result<String> {
    let key = key.as_bytes();
    if key.is_empty() {
        return Err(CipherError::InvalidKey("key must not be empty".into()));
    }
    Ok(text
        .chars()
        .enumerate()
        .map(|(i, ch)| xor_char(ch, key[i % key.len()] as u32))
        .collect())
}

/// Adds a running 32-bit polynomial hash to each code point, modulo 256.
pub fn rolling_hash(text: &str) -> String {
    let mut hash: u32 = 0;
    text.chars()
        .map(|ch| {
            let c = ch as u32;
            hash = hash.wrapping_mul(31).wrapping_add(c);
            char::from(((c + hash % 256) % 256) as u8)
        })
        .collect()
}

/// Letter shift driven by the logistic map `x <- 3.9 x (1 - x)`.
pub fn chaotic_map(text: &str) -> String {
    let mut x = 0.1f64;
    canonicalize(text)
        .chars()
        .map(|ch| {
            x = 3.9 * x * (1.0 - x);
            let shift = (x * 256.0) as i64 % 26;
            match letter_index(ch) {
                Some(idx) => index_letter(idx as i64 + shift),
                None => ch,
            }
        })
        .collect()
}

pub(crate) fn register(reg: &mut Registry) {
    const SHIFT: &[ParamSpec] = &[ParamSpec::number("shift")];
    const KEY: &[ParamSpec] = &[ParamSpec::text("key")];

    reg.register(
        CipherDescriptor::new(
            "caesar",
            "Caesar Cipher",
            "Shift each letter by a fixed amount. The oldest and simplest cipher.",
            |t, p| Ok(caesar(t, p.number_or("shift", 3)?)),
        )
        .with_params(SHIFT)
        .with_decrypt(|t, p| Ok(caesar_decrypt(t, p.number_or("shift", 3)?))),
    );
    reg.register(
        CipherDescriptor::new(
            "rot13",
            "ROT13",
            "Caesar with a shift of 13. Applying it twice restores the text.",
            plain(rot13),
        )
        .self_inverse(),
    );
    for (slug, name, description) in [
        ("atbash", "Atbash Cipher", "Mirror the alphabet: A and Z swap, B and Y swap, and so on."),
        ("reverse-alphabet", "Reverse Alphabet", "Replace each letter with its mirror in the reversed alphabet."),
        ("mirror", "Mirror Alphabet", "Atbash under another name."),
    ] {
        reg.register(CipherDescriptor::new(slug, name, description, plain(atbash)).self_inverse());
    }
    reg.register(CipherDescriptor::new(
        "mirrored",
        "Mirrored Alphabet",
        "Mirror alphabet mapping, encode only.",
        plain(atbash),
    ));
    reg.register(
        CipherDescriptor::new(
            "atbash-shifted",
            "Atbash with Shift",
            "Atbash followed by a Caesar shift.",
            |t, p| Ok(atbash_shifted(t, p.number_or("shift", 1)?)),
        )
        .with_params(SHIFT),
    );
    reg.register(
        CipherDescriptor::new(
            "shift-variant",
            "Generic Shift Cipher",
            "Plain letter shift with a configurable amount.",
            |t, p| Ok(caesar(t, p.number_or("shift", 3)?)),
        )
        .with_params(SHIFT),
    );
    reg.register(
        CipherDescriptor::new(
            "modular",
            "Modular Cipher",
            "Add a modulus value to every letter index.",
            |t, p| Ok(caesar(t, p.number_or("mod", 13)?)),
        )
        .with_params(const { &[ParamSpec::number("mod")] }),
    );
    reg.register(
        CipherDescriptor::new(
            "keyboard-shift",
            "Keyboard Shift",
            "Move each letter one key along the QWERTY layout.",
            |t, _| Ok(keyboard_shift(t, 1)),
        )
        .with_decrypt(|t, _| Ok(keyboard_shift(t, -1))),
    );
    reg.register(
        CipherDescriptor::new(
            "keyboard-qwerty",
            "QWERTY Keyboard Shift",
            "Shift along the QWERTY letter rows by an offset, lowercase output.",
            |t, p| Ok(keyboard_qwerty(t, p.number_or("offset", 1)?)),
        )
        .with_params(const { &[ParamSpec::number("offset")] }),
    );
    reg.register(CipherDescriptor::new(
        "progressive-shift",
        "Progressive Shift",
        "Each letter shifts by one more than the previous position.",
        plain(progressive_shift),
    ));
    reg.register(CipherDescriptor::new(
        "sum-cipher",
        "Sum Cipher",
        "Add the character position to each letter.",
        plain(sum_cipher),
    ));
    reg.register(
        CipherDescriptor::new(
            "alternating-shift",
            "Alternating Shift",
            "Alternate between two shift values.",
            |t, p| {
                Ok(alternating_shift(
                    t,
                    p.number_or("shift1", 1)?,
                    p.number_or("shift2", 2)?,
                ))
            },
        )
        .with_params(const { &[ParamSpec::number("shift1"), ParamSpec::number("shift2")] }),
    );
    reg.register(
        CipherDescriptor::new(
            "word-shift",
            "Word Shift",
            "Shift only the first letter of each word.",
            |t, p| Ok(word_shift(t, p.number_or("shift", 1)?)),
        )
        .with_params(SHIFT),
    );
    reg.register(
        CipherDescriptor::new(
            "rotating-rotor",
            "Rotating Rotor",
            "Shift cycles through a number of rotor positions.",
            |t, p| rotating_rotor(t, p.number_or("rotors", 3)?),
        )
        .with_params(const { &[ParamSpec::number("rotors")] }),
    );
    reg.register(CipherDescriptor::new(
        "enigma-simple",
        "Enigma Cipher",
        "Toy two-rotor stepping shift loosely modelled on Enigma.",
        plain(enigma_simple),
    ));
    reg.register(
        CipherDescriptor::new(
            "rot47",
            "ROT47",
            "Rotate printable ASCII by 47. Self-inverse.",
            plain(rot47),
        )
        .self_inverse(),
    );
    reg.register(
        CipherDescriptor::new(
            "xor",
            "Simple XOR",
            "XOR each character with a single byte key. Self-inverse.",
            |t, p| Ok(xor(t, p.number_or("key", 123)?)),
        )
        .with_params(const { &[ParamSpec::number("key")] })
        .self_inverse(),
    );
    reg.register(
        CipherDescriptor::new(
            "xor-extended",
            "Extended XOR",
            "XOR with a repeating multi-byte key. Self-inverse.",
            |t, p| xor_extended(t, &p.text_or("key", "SECRET")),
        )
        .with_params(KEY)
        .self_inverse(),
    );
    reg.register(CipherDescriptor::new(
        "rolling-hash",
        "Rolling Hash",
        "Offset each character by a running hash of the text so far.",
        plain(rolling_hash),
    ));
    reg.register(CipherDescriptor::new(
        "chaotic-map",
        "Chaotic Map",
        "Letter shifts drawn from the logistic map.",
        plain(chaotic_map),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caesar_shifts_and_wraps() {
        assert_eq!(caesar("xyz abc", 3), "ABC DEF");
        assert_eq!(caesar_decrypt("ABC DEF", 3), "XYZ ABC");
        assert_eq!(caesar("ABC", -1), "ZAB");
    }

    #[test]
    fn extreme_shifts_do_not_overflow() {
        for shift in [i64::MIN, i64::MIN + 1, i64::MAX, 0, 26, -26] {
            let enc = caesar("Attack at dawn", shift);
            assert_eq!(caesar_decrypt(&enc, shift), "ATTACK AT DAWN", "shift={shift}");

            let enc = atbash_shifted("Attack at dawn", shift);
            assert_eq!(atbash_shifted_decrypt(&enc, shift), "ATTACK AT DAWN", "shift={shift}");
        }
    }

    #[test]
    fn atbash_is_self_inverse() {
        assert_eq!(atbash("Hello, World"), "SVOOL, DLIOW");
        assert_eq!(atbash(&atbash("Hello, World")), "HELLO, WORLD");
    }

    #[test]
    fn atbash_shifted_roundtrip() {
        let enc = atbash_shifted("Attack at dawn", 4);
        assert_eq!(atbash_shifted_decrypt(&enc, 4), "ATTACK AT DAWN");
    }

    #[test]
    fn keyboard_shift_roundtrip() {
        assert_eq!(keyboard_shift("qwerty", 1), "WERTYU");
        assert_eq!(keyboard_shift("M", 1), "Q");
        assert_eq!(keyboard_shift(&keyboard_shift("Hi there!", 1), -1), "HI THERE!");
    }

    #[test]
    fn keyboard_qwerty_is_lowercase() {
        assert_eq!(keyboard_qwerty("QWE", 1), "wer");
    }

    #[test]
    fn rot47_is_self_inverse() {
        assert_eq!(rot47("Hello"), "w6==@");
        assert_eq!(rot47(&rot47("p@ss w0rd!")), "p@ss w0rd!");
    }

    #[test]
    fn xor_is_self_inverse() {
        let enc = xor("hello", 123);
        assert_ne!(enc, "hello");
        assert_eq!(xor(&enc, 123), "hello");
        assert_eq!(xor("A", 256), "A");
    }

    #[test]
    fn xor_extended_rejects_empty_key() {
        assert!(matches!(
            xor_extended("abc", ""),
            Err(CipherError::InvalidKey(_))
        ));
        let enc = xor_extended("secret text", "KEY").unwrap();
        assert_eq!(xor_extended(&enc, "KEY").unwrap(), "secret text");
    }

    #[test]
    fn word_shift_touches_first_letters() {
        assert_eq!(word_shift("hello  world", 1), "Iello Xorld");
    }

    #[test]
    fn rotating_rotor_validates() {
        assert!(rotating_rotor("abc", 0).is_err());
        assert_eq!(rotating_rotor("AAAA", 3).unwrap(), "BCDB");
    }

    #[test]
    fn positional_shifts() {
        assert_eq!(progressive_shift("AAA"), "BCD");
        assert_eq!(sum_cipher("AAA"), "ABC");
        assert_eq!(alternating_shift("AAAA", 1, 2), "BCBC");
    }

    #[test]
    fn chaotic_map_keeps_punctuation() {
        let out = chaotic_map("a, b");
        assert_eq!(out.chars().nth(1), Some(','));
        assert_eq!(out.chars().nth(2), Some(' '));
    }
}
