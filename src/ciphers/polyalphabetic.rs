//! Keyed polyalphabetic ciphers.
//!
//! Alphabetic keys are validated up front: an empty key or one containing
//! anything but `A`..=`Z` (after uppercasing) is an [`CipherError::InvalidKey`].

use crate::alphabet::{alphabetic_key, canonicalize, letter_index, map_letters, map_letters_keyed};
use crate::error::{CipherError, Result};
use crate::params::ParamSpec;
use crate::registry::{CipherDescriptor, Registry};

fn require_alpha(key: &str) -> Result<Vec<i64>> {
    alphabetic_key(key)
        .ok_or_else(|| CipherError::InvalidKey("key must contain only A-Z letters".into()))
}

/// Classic Vigenère; the key advances on letters only.
pub fn vigenere(text: &str, key: &str) -> Result<String> {
    let key = require_alpha(key)?;
    Ok(map_letters_keyed(text, |n, x| x + key[n % key.len()]))
}

pub fn vigenere_decrypt(text: &str, key: &str) -> Result<String> {
    let key = require_alpha(key)?;
    Ok(map_letters_keyed(text, |n, x| x - key[n % key.len()]))
}

/// `key - text`, which makes the cipher its own inverse.
pub fn beaufort(text: &str, key: &str) -> Result<String> {
    let key = require_alpha(key)?;
    Ok(map_letters_keyed(text, |n, x| key[n % key.len()] - x))
}

/// Autokey Vigenère: the key stream is the key followed by the plaintext.
pub fn vigenere_autokey(text: &str, key: &str) -> Result<String> {
    let key = require_alpha(key)?;
    let plain: Vec<i64> = canonicalize(text)
        .chars()
        .filter_map(letter_index)
        .map(i64::from)
        .collect();
    Ok(map_letters_keyed(text, |n, x| {
        let k = if n < key.len() {
            key[n]
        } else {
            plain[n - key.len()]
        };
        x + k
    }))
}

/// Key repeated over every character position, letters or not.
pub fn running_key(text: &str, key: &str) -> Result<String> {
    let key = require_alpha(key)?;
    Ok(map_letters(text, |pos, x| x + key[pos % key.len()]))
}

/// Vigenère with a digit key.
pub fn gronsfeld(text: &str, key: &str) -> Result<String> {
    let digits: Option<Vec<i64>> = key
        .chars()
        .map(|c| c.to_digit(10).map(i64::from))
        .collect();
    let digits = match digits {
        Some(d) if !d.is_empty() => d,
        _ => return Err(CipherError::InvalidKey("key must contain only digits".into())),
    };
    Ok(map_letters_keyed(text, |n, x| x + digits[n % digits.len()]))
}

pub fn quagmire(text: &str, key: &str) -> Result<String> {
    running_key(text, key)
}

/// Porta: thirteen reciprocal alphabets, one per key-letter pair.
pub fn porta(text: &str, key: &str) -> Result<String> {
    let key = require_alpha(key)?;
    Ok(map_letters_keyed(text, |n, x| {
        let k = key[n % key.len()] / 2;
        if x < 13 {
            (x + k) % 13 + 13
        } else {
            (x - 13 - k).rem_euclid(13)
        }
    }))
}

/// Alternates between two fixed keys by position.
pub fn polyalphabetic(text: &str) -> String {
    const KEYS: [&[u8]; 2] = [b"CIPHER", b"SECRET"];
    map_letters(text, |pos, x| {
        let key = KEYS[pos % KEYS.len()];
        x + (key[pos % key.len()] - b'A') as i64
    })
}

pub fn one_time_pad(text: &str, key: &str) -> Result<String> {
    running_key(text, key)
}

/// Vigenère plus the character position.
pub fn vigenere_progressive(text: &str, key: &str) -> Result<String> {
    let key = require_alpha(key)?;
    Ok(map_letters(text, |pos, x| x + pos as i64 + key[pos % key.len()]))
}

pub fn hybrid_vigenere_caesar(text: &str, key: &str) -> Result<String> {
    let key = require_alpha(key)?;
    Ok(map_letters(text, |pos, x| {
        x + key[pos % key.len()] + (pos % 26) as i64
    }))
}

/// Replaces the letter with value `v` by the `v`-th character of a key word
/// chosen by position. Letters beyond the word's length pass through.
pub fn book_cipher(text: &str, key: &str) -> Result<String> {
    let key = canonicalize(key);
    let words: Vec<Vec<char>> = key.split_whitespace().map(|w| w.chars().collect()).collect();
    if words.is_empty() {
        return Err(CipherError::InvalidKey("key must contain at least one word".into()));
    }
    Ok(canonicalize(text)
        .chars()
        .enumerate()
        .map(|(i, ch)| {
            let word = &words[i % words.len()];
            letter_index(ch)
                .and_then(|idx| word.get(idx as usize).copied())
                .unwrap_or(ch)
        })
        .collect())
}

pub(crate) fn register(reg: &mut Registry) {
    const KEY: &[ParamSpec] = &[ParamSpec::text("key")];

    reg.register(
        CipherDescriptor::new(
            "vigenere",
            "Vigenère Cipher",
            "Polyalphabetic cipher with a repeating key. Much stronger than Caesar.",
            |t, p| vigenere(t, &p.text_or("key", "KEY")),
        )
        .with_params(KEY)
        .with_decrypt(|t, p| vigenere_decrypt(t, &p.text_or("key", "KEY"))),
    );
    reg.register(
        CipherDescriptor::new(
            "beaufort",
            "Beaufort Cipher",
            "Reciprocal relative of Vigenère. The same operation encrypts and decrypts.",
            |t, p| beaufort(t, &p.text_or("key", "SECRET")),
        )
        .with_params(KEY)
        .self_inverse(),
    );
    reg.register(
        CipherDescriptor::new(
            "porta",
            "Porta Cipher",
            "Reciprocal polyalphabetic cipher with thirteen alphabets.",
            |t, p| porta(t, &p.text_or("key", "SECRET")),
        )
        .with_params(KEY)
        .self_inverse(),
    );
    reg.register(
        CipherDescriptor::new(
            "vigenere-autokey",
            "Vigenère Autokey",
            "Vigenère whose key is extended with the plaintext itself.",
            |t, p| vigenere_autokey(t, &p.text_or("key", "KEY")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "running-key",
            "Running Key Cipher",
            "Key stretched over the whole message.",
            |t, p| running_key(t, &p.text_or("key", "KEY")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "gronsfeld",
            "Gronsfeld Cipher",
            "Vigenère with a numeric key.",
            |t, p| gronsfeld(t, &p.text_or("key", "1234567")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "quagmire",
            "Quagmire Cipher",
            "Position-keyed alphabet shift.",
            |t, p| quagmire(t, &p.text_or("key", "ZEBRAS")),
        )
        .with_params(KEY),
    );
    reg.register(CipherDescriptor::new(
        "polyalphabetic",
        "Polyalphabetic Substitution",
        "Alternate between two fixed key alphabets.",
        super::plain(polyalphabetic),
    ));
    reg.register(
        CipherDescriptor::new(
            "one-time-pad",
            "One-Time Pad",
            "Pad letters added to the message. Only secure with a truly random, single-use pad.",
            |t, p| one_time_pad(t, &p.text_or("key", "ONETIMEPAD")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "vigenere-progressive",
            "Progressive Vigenère",
            "Vigenère with an extra shift that grows along the text.",
            |t, p| vigenere_progressive(t, &p.text_or("key", "KEY")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "hybrid-vigenere-caesar",
            "Hybrid Vigenère-Caesar",
            "Vigenère key shift combined with a positional Caesar shift.",
            |t, p| hybrid_vigenere_caesar(t, &p.text_or("key", "SECRET")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "book-cipher",
            "Book Cipher",
            "Look letters up inside the words of a key phrase.",
            |t, p| book_cipher(t, &p.text_or("key", "THE QUICK BROWN FOX")),
        )
        .with_params(KEY),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vigenere_textbook_example() {
        assert_eq!(vigenere("ATTACKATDAWN", "LEMON").unwrap(), "LXFOPVEFRNHR");
        assert_eq!(
            vigenere_decrypt("LXFOPVEFRNHR", "LEMON").unwrap(),
            "ATTACKATDAWN"
        );
    }

    #[test]
    fn vigenere_key_skips_punctuation() {
        let enc = vigenere("attack, at dawn!", "lemon").unwrap();
        assert_eq!(enc, "LXFOPV, EF RNHR!");
    }

    #[test]
    fn invalid_keys_are_rejected() {
        assert!(matches!(vigenere("abc", ""), Err(CipherError::InvalidKey(_))));
        assert!(matches!(beaufort("abc", "K3Y"), Err(CipherError::InvalidKey(_))));
        assert!(matches!(gronsfeld("abc", "12a"), Err(CipherError::InvalidKey(_))));
        assert!(matches!(book_cipher("abc", "   "), Err(CipherError::InvalidKey(_))));
    }

    #[test]
    fn beaufort_is_self_inverse() {
        let enc = beaufort("Defend the east wall", "FORTIFICATION").unwrap();
        assert_eq!(
            beaufort(&enc, "FORTIFICATION").unwrap(),
            "DEFEND THE EAST WALL"
        );
    }

    #[test]
    fn porta_is_reciprocal() {
        let enc = porta("Meet me at noon", "SECRET").unwrap();
        assert_ne!(enc, "MEET ME AT NOON");
        assert_eq!(porta(&enc, "SECRET").unwrap(), "MEET ME AT NOON");
    }

    #[test]
    fn autokey_uses_plaintext() {
        // key QUEEN then plaintext ATTACKATDAWN
        assert_eq!(
            vigenere_autokey("ATTACKATDAWN", "QUEEN").unwrap(),
            "QNXEPKTMDCGN"
        );
    }

    #[test]
    fn gronsfeld_shifts_by_digits() {
        assert_eq!(gronsfeld("AAA", "123").unwrap(), "BCD");
    }

    #[test]
    fn book_cipher_picks_word_letters() {
        // A -> first letter of "THE", B -> second letter of "QUICK"
        assert_eq!(book_cipher("AB", "THE QUICK").unwrap(), "TU");
        // Z is beyond "THE", so it passes through
        assert_eq!(book_cipher("Z", "THE").unwrap(), "Z");
    }
}
