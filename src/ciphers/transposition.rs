//! Transpositions: the letters stay, their order changes.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::alphabet::canonicalize;
use crate::error::{CipherError, Result};
use crate::params::ParamSpec;
use crate::registry::{CipherDescriptor, Registry};

use super::plain;

/// Upper bound for grid widths that are padded up front.
const MAX_WIDTH: i64 = 1 << 16;
const ANAGRAM_SEED: u64 = 42;

fn width(name: &str, value: i64, min: i64) -> Result<usize> {
    if value < min {
        return Err(CipherError::InvalidParameter(format!(
            "{name} must be at least {min}"
        )));
    }
    if value > MAX_WIDTH {
        return Err(CipherError::InvalidParameter(format!(
            "{name} must be at most {MAX_WIDTH}"
        )));
    }
    Ok(value as usize)
}

fn canonical_chars(text: &str) -> Vec<char> {
    canonicalize(text).chars().collect()
}

fn pad_to_multiple(chars: &mut Vec<char>, n: usize) {
    while chars.len() % n != 0 {
        chars.push('X');
    }
}

/// Rail index of every position along the zigzag.
fn rail_pattern(len: usize, rails: i64) -> Vec<usize> {
    // With at least as many rails as characters the zigzag never turns.
    let rails = usize::try_from(rails).unwrap_or(usize::MAX).min(len.max(2));
    let cycle = 2 * (rails - 1);
    (0..len)
        .map(|i| {
            let r = i % cycle;
            if r < rails { r } else { cycle - r }
        })
        .collect()
}

/// Positions in the order they are emitted: rail by rail, left to right.
fn rail_order(len: usize, rails: i64) -> Vec<usize> {
    let pattern = rail_pattern(len, rails);
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by_key(|&i| pattern[i]);
    order
}

fn check_rails(rails: i64) -> Result<()> {
    if rails < 2 {
        return Err(CipherError::InvalidParameter("rails must be at least 2".into()));
    }
    Ok(())
}

fn zigzag_read(chars: &[char], rails: i64) -> String {
    rail_order(chars.len(), rails).into_iter().map(|i| chars[i]).collect()
}

pub fn rail_fence(text: &str, rails: i64) -> Result<String> {
    check_rails(rails)?;
    Ok(zigzag_read(&canonical_chars(text), rails))
}

pub fn rail_fence_decrypt(text: &str, rails: i64) -> Result<String> {
    check_rails(rails)?;
    let chars = canonical_chars(text);
    let mut out = vec![' '; chars.len()];
    for (&pos, &ch) in rail_order(chars.len(), rails).iter().zip(&chars) {
        out[pos] = ch;
    }
    Ok(out.into_iter().collect())
}

/// Rail fence over the text exactly as given.
pub fn zigzag_extended(text: &str, rails: i64) -> Result<String> {
    check_rails(rails)?;
    let chars: Vec<char> = text.chars().collect();
    Ok(zigzag_read(&chars, rails))
}

/// Stable argsort of the key characters.
fn column_order(key: &[char]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..key.len()).collect();
    order.sort_by_key(|&i| key[i]);
    order
}

/// Reads the grid column by column in `order`; a short last row just
/// contributes fewer characters.
fn read_columns(chars: &[char], cols: usize, order: impl IntoIterator<Item = usize>) -> String {
    let mut out = String::with_capacity(chars.len());
    for col in order {
        out.extend(chars.chunks(cols).filter_map(|row| row.get(col)));
    }
    out
}

fn column_key(key: &str) -> Result<Vec<char>> {
    let key = canonical_chars(key);
    if key.is_empty() {
        return Err(CipherError::InvalidKey("key must not be empty".into()));
    }
    Ok(key)
}

/// Keyed columnar transposition, padded with `X`.
pub fn columnar(text: &str, key: &str) -> Result<String> {
    let key = column_key(key)?;
    let mut chars = canonical_chars(text);
    pad_to_multiple(&mut chars, key.len());
    Ok(read_columns(&chars, key.len(), column_order(&key)))
}

/// Columnar with `X` padding, reading the column whose key rank matches the
/// output slot. The text is not canonicalized.
pub fn nicodemus(text: &str, key: &str) -> Result<String> {
    let key = column_key(key)?;
    let order = column_order(&key);
    let mut rank = vec![0; key.len()];
    for (r, &col) in order.iter().enumerate() {
        rank[col] = r;
    }
    let mut chars: Vec<char> = text.chars().collect();
    pad_to_multiple(&mut chars, key.len());
    Ok(read_columns(&chars, key.len(), rank))
}

/// Unpadded columnar with `key1`, then again with `key2`. Spaces are removed.
pub fn columnar_double(text: &str, key1: &str, key2: &str) -> Result<String> {
    let (key1, key2) = (column_key(key1)?, column_key(key2)?);
    let chars: Vec<char> = canonicalize(text).chars().filter(|c| *c != ' ').collect();
    let first: Vec<char> = read_columns(&chars, key1.len(), column_order(&key1))
        .chars()
        .collect();
    Ok(read_columns(&first, key2.len(), column_order(&key2)))
}

/// Caesar shift of 3 followed by an unpadded columnar transposition.
pub fn hybrid_subst_transpos(text: &str, key: &str) -> Result<String> {
    let key = column_key(key)?;
    let shifted: Vec<char> = super::shift::caesar(text, 3).chars().collect();
    Ok(read_columns(&shifted, key.len(), column_order(&key)))
}

/// Pads to a multiple of `key` and reads every `key`-th character.
pub fn simple_transpose(text: &str, key: i64) -> Result<String> {
    let key = width("key", key, 2)?;
    let mut chars = canonical_chars(text);
    pad_to_multiple(&mut chars, key);
    Ok(read_columns(&chars, key, 0..key))
}

pub fn double_transposition(text: &str, key: i64) -> Result<String> {
    let once = simple_transpose(text, key)?;
    simple_transpose(&once, key + 1)
}

/// Wraps the text around a rod of `rails` faces.
pub fn scytale(text: &str, rails: i64) -> Result<String> {
    let rails = width("rails", rails, 1)?;
    let chars = canonical_chars(text);
    Ok(read_columns(&chars, rails, 0..rails))
}

pub fn skip(text: &str, skip: i64) -> Result<String> {
    if skip < 1 {
        return Err(CipherError::InvalidParameter("skip must be at least 1".into()));
    }
    let step = usize::try_from(skip).unwrap_or(usize::MAX);
    Ok(canonicalize(text).chars().step_by(step).collect())
}

pub fn block_reverse(text: &str, size: i64) -> Result<String> {
    if size < 1 {
        return Err(CipherError::InvalidParameter("size must be at least 1".into()));
    }
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    Ok(canonical_chars(text)
        .chunks(size)
        .flat_map(|block| block.iter().rev())
        .collect())
}

/// Splits the text into one section per key character and reverses each;
/// the last section takes the remainder.
pub fn fence_extended(text: &str, key: &str) -> Result<String> {
    let sections = key.chars().count();
    if sections == 0 {
        return Err(CipherError::InvalidKey("key must not be empty".into()));
    }
    let chars: Vec<char> = text.chars().collect();
    let size = chars.len() / sections;
    let mut out = String::with_capacity(chars.len());
    for i in 0..sections {
        let start = i * size;
        let end = if i + 1 == sections { chars.len() } else { start + size };
        out.extend(chars[start..end].iter().rev());
    }
    Ok(out)
}

/// Lays the text out in rows of 1, 2, 3, ... and keeps each row's diagonal.
pub fn pyramid(text: &str) -> String {
    let chars: Vec<char> = canonicalize(text).chars().filter(|c| *c != ' ').collect();
    let mut out = String::new();
    let (mut start, mut row) = (0, 0);
    while start < chars.len() {
        let end = (start + row + 1).min(chars.len());
        if let Some(&ch) = chars[start..end].get(row) {
            out.push(ch);
        }
        start = end;
        row += 1;
    }
    out
}

pub fn palindrome(text: &str) -> String {
    let text = canonicalize(text);
    let reversed: String = text.chars().rev().collect();
    text + &reversed
}

/// Reverses every second whitespace-separated word.
pub fn alternating_reverse(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if i % 2 == 1 {
                word.chars().rev().collect()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pairs the second half with the first; an odd trailing character is lost.
pub fn interleave(text: &str) -> String {
    let chars = canonical_chars(text);
    let (first, second) = chars.split_at(chars.len() / 2);
    second
        .iter()
        .zip(first)
        .flat_map(|(a, b)| [*a, *b])
        .collect()
}

fn square_grid(text: &str) -> (Vec<char>, usize) {
    let mut chars = canonical_chars(text);
    let mut size = chars.len().isqrt();
    if size * size < chars.len() {
        size += 1;
    }
    chars.resize(size * size, 'X');
    (chars, size)
}

pub fn square_root(text: &str) -> String {
    let (grid, size) = square_grid(text);
    read_columns(&grid, size, 0..size)
}

/// Reads the square grid along its anti-diagonals.
pub fn diagonal(text: &str) -> String {
    let (grid, size) = square_grid(text);
    let mut out = String::with_capacity(grid.len());
    for d in 0..(2 * size).saturating_sub(1) {
        for i in 0..size {
            if let Some(j) = d.checked_sub(i).filter(|&j| j < size) {
                out.push(grid[i * size + j]);
            }
        }
    }
    out
}

/// Even positions, then odd positions.
pub fn zigzag(text: &str) -> String {
    let chars = canonical_chars(text);
    chars.iter().step_by(2).chain(chars.iter().skip(1).step_by(2)).collect()
}

/// Row-by-row triangle read, which leaves the order unchanged.
pub fn triangle(text: &str) -> String {
    canonicalize(text)
}

pub fn reverse(text: &str) -> String {
    text.chars().rev().collect()
}

pub fn word_reverse(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.chars().rev().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Four passes over a padded square grid, alternating cell parity.
pub fn fleissner(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    let size = chars.len().isqrt() + 1;
    chars.resize(size * size, 'X');
    let mut out = String::with_capacity(chars.len() * 2);
    for rotation in 0..4 {
        for i in 0..size {
            for j in 0..size {
                if (i + j) % 2 == rotation % 2 {
                    out.push(chars[i * size + j]);
                }
            }
        }
    }
    out
}

/// Every fifth character.
pub fn null_cipher(text: &str) -> String {
    text.chars().step_by(5).collect()
}

/// Deterministic shuffle of the canonical text.
pub fn anagram(text: &str) -> String {
    let mut chars = canonical_chars(text);
    let mut rng = StdRng::seed_from_u64(ANAGRAM_SEED);
    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}

pub(crate) fn register(reg: &mut Registry) {
    const RAILS: &[ParamSpec] = &[ParamSpec::number("rails")];
    const KEY: &[ParamSpec] = &[ParamSpec::text("key")];
    const NUMBER_KEY: &[ParamSpec] = &[ParamSpec::number("key")];

    reg.register(
        CipherDescriptor::new(
            "rail-fence",
            "Rail Fence Cipher",
            "Write the text in a zigzag over several rails and read rail by rail.",
            |t, p| rail_fence(t, p.number_or("rails", 3)?),
        )
        .with_params(RAILS)
        .with_decrypt(|t, p| rail_fence_decrypt(t, p.number_or("rails", 3)?)),
    );
    reg.register(
        CipherDescriptor::new(
            "rail-fence-var",
            "Rail Fence Variant",
            "Rail fence transposition, encode only.",
            |t, p| rail_fence(t, p.number_or("rails", 3)?),
        )
        .with_params(RAILS),
    );
    reg.register(
        CipherDescriptor::new(
            "zigzag-extended",
            "Extended Zigzag",
            "Rail fence over the raw text, punctuation and case included.",
            |t, p| zigzag_extended(t, p.number_or("rails", 4)?),
        )
        .with_params(RAILS),
    );
    for (slug, name, default) in [
        ("transposition", "Columnar Transposition", "KEY"),
        ("columnar-var", "Columnar Variant", "SECRET"),
        ("cadenus", "Cadenus Cipher", "CADENUS"),
    ] {
        reg.register(
            CipherDescriptor::new(
                slug,
                name,
                "Write the text in rows under a keyword and read columns in key order.",
                move |t, p| columnar(t, &p.text_or("key", default)),
            )
            .with_params(KEY),
        );
    }
    reg.register(
        CipherDescriptor::new(
            "nicodemus",
            "Nicodemus Cipher",
            "Columnar transposition over the raw text with X padding.",
            |t, p| nicodemus(t, &p.text_or("key", "SECRET")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "columnar-double",
            "Double Columnar",
            "Two keyed columnar passes without padding.",
            |t, p| {
                columnar_double(
                    t,
                    &p.text_or("key1", "SECRET"),
                    &p.text_or("key2", "DOUBLE"),
                )
            },
        )
        .with_params(const { &[ParamSpec::text("key1"), ParamSpec::text("key2")] }),
    );
    reg.register(
        CipherDescriptor::new(
            "hybrid-subst-transpos",
            "Hybrid Substitution-Transposition",
            "Caesar shift followed by a keyed columnar transposition.",
            |t, p| hybrid_subst_transpos(t, &p.text_or("key", "SECRET")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "fence-extended",
            "Extended Fence",
            "Reverse one section of the text per key character.",
            |t, p| fence_extended(t, &p.text_or("key", "SECRET")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "simple-transpose",
            "Simple Transposition",
            "Read every n-th character after padding to a full grid.",
            |t, p| simple_transpose(t, p.number_or("key", 2)?),
        )
        .with_params(NUMBER_KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "double-transposition",
            "Double Transposition",
            "Simple transposition with the key, then with key + 1.",
            |t, p| double_transposition(t, p.number_or("key", 3)?),
        )
        .with_params(NUMBER_KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "scytale",
            "Scytale Cipher",
            "Wrap the text around a rod.",
            |t, p| scytale(t, p.number_or("rails", 3)?),
        )
        .with_params(RAILS),
    );
    reg.register(
        CipherDescriptor::new(
            "skip",
            "Skip Cipher",
            "Keep every n-th character.",
            |t, p| skip(t, p.number_or("skip", 2)?),
        )
        .with_params(const { &[ParamSpec::number("skip")] }),
    );
    reg.register(
        CipherDescriptor::new(
            "block-reverse",
            "Block Reverse",
            "Reverse the text in fixed-size blocks.",
            |t, p| block_reverse(t, p.number_or("size", 3)?),
        )
        .with_params(const { &[ParamSpec::number("size")] }),
    );
    reg.register(
        CipherDescriptor::new("reverse", "Reverse Cipher", "Reverse the whole text.", plain(reverse))
            .self_inverse(),
    );
    reg.register(
        CipherDescriptor::new(
            "word-reverse",
            "Word Reverse",
            "Reverse each word in place.",
            plain(word_reverse),
        )
        .self_inverse(),
    );

    let fixed: [(&'static str, &'static str, &'static str, fn(&str) -> String); 12] = [
        ("pyramid", "Pyramid Cipher", "Arrange the text in a pyramid and read its diagonal.", pyramid),
        ("palindrome", "Palindrome Cipher", "Append the reversed text.", palindrome),
        ("alternating-reverse", "Alternating Reverse", "Reverse every other word.", alternating_reverse),
        ("reverse-every-second", "Reverse Every Second", "Reverse every second word.", alternating_reverse),
        ("interleave", "Interleave Cipher", "Interleave the two halves of the text.", interleave),
        ("square-root", "Square Root Cipher", "Fill a square grid by rows and read it by columns.", square_root),
        ("diagonal", "Diagonal Cipher", "Read a square grid along its diagonals.", diagonal),
        ("zigzag", "Zigzag Cipher", "Even positions first, then odd positions.", zigzag),
        ("triangle", "Triangle Cipher", "Triangular row arrangement.", triangle),
        ("fleissner", "Fleissner Grille", "Rotating-grille read over a square grid.", fleissner),
        ("null-cipher", "Null Cipher", "Keep every fifth character.", null_cipher),
        ("anagram", "Anagram Cipher", "Deterministic shuffle of the characters.", anagram),
    ];
    for (slug, name, description, f) in fixed {
        reg.register(CipherDescriptor::new(slug, name, description, plain(f)));
    }
}
