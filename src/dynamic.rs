//! Resolves parameterized slugs such as `caesar-7` or `affine-a5-b8`.
//!
//! Every resolved descriptor has its parameters baked in and takes none from
//! the caller. Anything that does not match a pattern, or matches one with
//! out-of-range values, resolves to `None`.

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::alphabet::{ALPHABET_LEN, mod_inverse};
use crate::ciphers::{arithmetic, polyalphabetic, shift, transposition};
use crate::registry::CipherDescriptor;

static AFFINE_SLUG: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^affine-a([0-9]+)-b([0-9]+)$").ok());

/// Decimal digits only, no sign, within `range`.
fn parse_bounded(digits: &str, range: RangeInclusive<i64>) -> Option<i64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok().filter(|n| range.contains(n))
}

/// `A`..=`Z` after dropping dashes and uppercasing.
fn parse_key(raw: &str) -> Option<String> {
    let key = raw.replace('-', "").to_ascii_uppercase();
    (!key.is_empty() && key.bytes().all(|b| b.is_ascii_uppercase())).then_some(key)
}

pub fn resolve(slug: &str) -> Option<CipherDescriptor> {
    let descriptor = resolve_pattern(slug)?;
    debug!(slug, "resolved dynamic cipher slug");
    Some(descriptor)
}

fn resolve_pattern(slug: &str) -> Option<CipherDescriptor> {
    for prefix in ["caesar-", "rot-", "shift-"] {
        if let Some(rest) = slug.strip_prefix(prefix) {
            return caesar(slug, parse_bounded(rest, 0..=25)?);
        }
    }
    if let Some(rest) = slug.strip_prefix("rail-fence-") {
        return rail_fence(slug, parse_bounded(rest, 2..=12)?);
    }
    if let Some(rest) = slug.strip_prefix("xor-") {
        return xor(slug, parse_bounded(rest, 0..=255)?);
    }
    if let Some(rest) = slug.strip_prefix("atbash-shift-") {
        return atbash_shift(slug, parse_bounded(rest, 0..=25)?);
    }
    if let Some(caps) = AFFINE_SLUG.as_ref().and_then(|re| re.captures(slug)) {
        let a = caps[1].parse::<i64>().ok()?;
        let b = parse_bounded(&caps[2], 0..=25)?;
        mod_inverse(a % ALPHABET_LEN, ALPHABET_LEN)?;
        return affine(slug, a, b);
    }
    if let Some(rest) = slug.strip_prefix("vigenere-key-") {
        return vigenere(slug, parse_key(rest)?);
    }
    if let Some(rest) = slug.strip_prefix("beaufort-key-") {
        return beaufort(slug, parse_key(rest)?);
    }
    None
}

fn caesar(slug: &str, n: i64) -> Option<CipherDescriptor> {
    Some(
        CipherDescriptor::new(
            slug.to_string(),
            format!("Caesar Shift {n}"),
            format!("Caesar cipher with a fixed shift of {n}."),
            move |t, _| Ok(shift::caesar(t, n)),
        )
        .with_decrypt(move |t, _| Ok(shift::caesar_decrypt(t, n))),
    )
}

fn rail_fence(slug: &str, rails: i64) -> Option<CipherDescriptor> {
    Some(
        CipherDescriptor::new(
            slug.to_string(),
            format!("Rail Fence ({rails} rails)"),
            format!("Rail fence transposition over {rails} rails."),
            move |t, _| transposition::rail_fence(t, rails),
        )
        .with_decrypt(move |t, _| transposition::rail_fence_decrypt(t, rails)),
    )
}

fn xor(slug: &str, key: i64) -> Option<CipherDescriptor> {
    Some(
        CipherDescriptor::new(
            slug.to_string(),
            format!("XOR {key}"),
            format!("XOR every character with {key}. Self-inverse."),
            move |t, _| Ok(shift::xor(t, key)),
        )
        .self_inverse(),
    )
}

fn atbash_shift(slug: &str, n: i64) -> Option<CipherDescriptor> {
    Some(
        CipherDescriptor::new(
            slug.to_string(),
            format!("Atbash + Shift {n}"),
            format!("Atbash followed by a Caesar shift of {n}."),
            move |t, _| Ok(shift::atbash_shifted(t, n)),
        )
        .with_decrypt(move |t, _| Ok(shift::atbash_shifted_decrypt(t, n))),
    )
}

fn affine(slug: &str, a: i64, b: i64) -> Option<CipherDescriptor> {
    Some(
        CipherDescriptor::new(
            slug.to_string(),
            format!("Affine a={a}, b={b}"),
            format!("Affine cipher ({a}x + {b}) mod 26."),
            move |t, _| arithmetic::affine(t, a, b),
        )
        .with_decrypt(move |t, _| arithmetic::affine_decrypt(t, a, b)),
    )
}

fn vigenere(slug: &str, key: String) -> Option<CipherDescriptor> {
    let decrypt_key = key.clone();
    Some(
        CipherDescriptor::new(
            slug.to_string(),
            format!("Vigenère ({key})"),
            format!("Vigenère cipher with the fixed key {key}."),
            move |t, _| polyalphabetic::vigenere(t, &key),
        )
        .with_decrypt(move |t, _| polyalphabetic::vigenere_decrypt(t, &decrypt_key)),
    )
}

fn beaufort(slug: &str, key: String) -> Option<CipherDescriptor> {
    Some(
        CipherDescriptor::new(
            slug.to_string(),
            format!("Beaufort ({key})"),
            format!("Beaufort cipher with the fixed key {key}. Self-inverse."),
            move |t, _| polyalphabetic::beaufort(t, &key),
        )
        .self_inverse(),
    )
}
