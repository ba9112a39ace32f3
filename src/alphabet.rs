//! Letter arithmetic over the 26-letter Latin alphabet.
//!
//! Every classic cipher works on canonicalized (uppercase) text and only
//! touches `A`..=`Z`; everything else is copied through in place.

/// Number of letters in the working alphabet.
pub const ALPHABET_LEN: i64 = 26;

/// The 25-letter square alphabet used by Polybius-style grids (no `J`).
pub const SQUARE_ALPHABET: &str = "ABCDEFGHIKLMNOPQRSTUVWXYZ";

/// Uppercases `text` for processing.
pub fn canonicalize(text: &str) -> String {
    text.to_uppercase()
}

/// Maps `A..=Z` to `0..=25`. Anything else, lowercase included, is `None`.
pub fn letter_index(ch: char) -> Option<u8> {
    if ch.is_ascii_uppercase() {
        Some(ch as u8 - b'A')
    } else {
        None
    }
}

/// Maps any integer onto a letter, wrapping modulo 26 first so negative
/// shifts land in range.
pub fn index_letter(n: i64) -> char {
    (b'A' + n.rem_euclid(ALPHABET_LEN) as u8) as char
}

/// Canonicalizes `text` and replaces each letter with
/// `index_letter(f(position, index))`.
///
/// `position` is the char offset in the canonical text, counting non-letters,
/// which is what the position-dependent ciphers key on.
pub fn map_letters<F>(text: &str, mut f: F) -> String
where
    F: FnMut(usize, i64) -> i64,
{
    canonicalize(text)
        .chars()
        .enumerate()
        .map(|(pos, ch)| match letter_index(ch) {
            Some(idx) => index_letter(f(pos, idx as i64)),
            None => ch,
        })
        .collect()
}

/// Like [`map_letters`], but the closure receives the running count of
/// letters seen so far instead of the raw position. Used by keyed ciphers
/// whose key only advances on letters.
pub fn map_letters_keyed<F>(text: &str, mut f: F) -> String
where
    F: FnMut(usize, i64) -> i64,
{
    let mut seen = 0usize;
    canonicalize(text)
        .chars()
        .map(|ch| match letter_index(ch) {
            Some(idx) => {
                let out = index_letter(f(seen, idx as i64));
                seen += 1;
                out
            }
            None => ch,
        })
        .collect()
}

pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Multiplicative inverse of `a` modulo `m`, if one exists.
pub fn mod_inverse(a: i64, m: i64) -> Option<i64> {
    let a = a.rem_euclid(m);
    (1..m).find(|x| (a * x) % m == 1)
}

/// Validates a key that must be non-empty and made of ASCII letters only,
/// returning the canonical letter indices.
pub fn alphabetic_key(key: &str) -> Option<Vec<i64>> {
    let key = canonicalize(key);
    if key.is_empty() {
        return None;
    }
    key.chars()
        .map(|c| letter_index(c).map(i64::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_letter_wraps_negative() {
        assert_eq!(index_letter(0), 'A');
        assert_eq!(index_letter(25), 'Z');
        assert_eq!(index_letter(26), 'A');
        assert_eq!(index_letter(-1), 'Z');
        assert_eq!(index_letter(-27), 'Z');
    }

    #[test]
    fn letter_index_rejects_non_letters() {
        assert_eq!(letter_index('A'), Some(0));
        assert_eq!(letter_index('Z'), Some(25));
        assert_eq!(letter_index('a'), None);
        assert_eq!(letter_index('1'), None);
        assert_eq!(letter_index('É'), None);
    }

    #[test]
    fn map_letters_preserves_non_letters() {
        let out = map_letters("ab, c!", |_, x| x + 1);
        assert_eq!(out, "BC, D!");
    }

    #[test]
    fn keyed_counter_skips_non_letters() {
        let mut positions = Vec::new();
        map_letters_keyed("A B-C", |n, x| {
            positions.push(n);
            x
        });
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn inverse_exists_only_for_coprimes() {
        assert_eq!(mod_inverse(5, 26), Some(21));
        assert_eq!(mod_inverse(1, 26), Some(1));
        assert_eq!(mod_inverse(4, 26), None);
        assert_eq!(mod_inverse(13, 26), None);
        assert_eq!(gcd(4, 26), 2);
    }

    #[test]
    fn alphabetic_key_validation() {
        assert_eq!(alphabetic_key("abc"), Some(vec![0, 1, 2]));
        assert_eq!(alphabetic_key(""), None);
        assert_eq!(alphabetic_key("AB1"), None);
        assert_eq!(alphabetic_key("A B"), None);
    }
}
