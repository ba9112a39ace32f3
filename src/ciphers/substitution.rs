//! Monoalphabetic substitutions, grid ciphers and the symbolic letter
//! encodings (Morse, Bacon, Pigpen, phonetic words, numeric positions).

use std::collections::HashMap;

use crate::alphabet::{SQUARE_ALPHABET, canonicalize, index_letter, letter_index};
use crate::error::{CipherError, Result};
use crate::params::ParamSpec;
use crate::registry::{CipherDescriptor, Registry};

use super::plain;

const DEFAULT_SUBSTITUTION_KEY: &str = "QWERTYUIOPASDFGHJKLZXCVBNM";
const REVERSE_KEYBOARD: &[u8; 26] = b"ZXCVBNMASDFGHJKLQWERTYUIOP";
const VOWELS: &str = "AEIOU";

const MORSE: [(char, &str); 38] = [
    ('A', ".-"), ('B', "-..."), ('C', "-.-."), ('D', "-.."), ('E', "."),
    ('F', "..-."), ('G', "--."), ('H', "...."), ('I', ".."), ('J', ".---"),
    ('K', "-.-"), ('L', ".-.."), ('M', "--"), ('N', "-."), ('O', "---"),
    ('P', ".--."), ('Q', "--.-"), ('R', ".-."), ('S', "..."), ('T', "-"),
    ('U', "..-"), ('V', "...-"), ('W', ".--"), ('X', "-..-"), ('Y', "-.--"),
    ('Z', "--.."), ('0', "-----"), ('1', ".----"), ('2', "..---"),
    ('3', "...--"), ('4', "....-"), ('5', "....."), ('6', "-...."),
    ('7', "--..."), ('8', "---.."), ('9', "----."), ('.', ".-.-.-"),
    (',', "--..--"),
];

const NATO: [&str; 26] = [
    "ALPHA", "BRAVO", "CHARLIE", "DELTA", "ECHO", "FOXTROT", "GOLF", "HOTEL",
    "INDIA", "JULIET", "KILO", "LIMA", "MIKE", "NOVEMBER", "OSCAR", "PAPA",
    "QUEBEC", "ROMEO", "SIERRA", "TANGO", "UNIFORM", "VICTOR", "WHISKEY",
    "XRAY", "YANKEE", "ZULU",
];

const PIGPEN: [&str; 26] = [
    "=|", "|=", "==", "X|", "|X", "XX", "=#", "#=", "##", "X#", "#X", "X==",
    "==X", "X==", "===", "|==", "==|", "X==X", "==X=", "=#=", "=#==#", "=#X",
    "X=#", "#=#", "=#X=", "X#X",
];

const STRADDLING: [&str; 26] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "80", "81", "82", "83",
    "84", "85", "86", "87", "88", "89", "90", "91", "92", "93", "94", "95",
];

const PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
    73, 79, 83, 89, 97,
];

const FIBONACCI: [u32; 16] = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987];

fn morse_code(ch: char) -> Option<&'static str> {
    MORSE.iter().find(|(c, _)| *c == ch).map(|(_, code)| *code)
}

/// Parses a 26-letter permutation key.
fn permutation_key(key: &str) -> Result<[u8; 26]> {
    let key = canonicalize(key);
    let bytes = key.as_bytes();
    let mut seen = [false; 26];
    if bytes.len() != 26 {
        return Err(CipherError::InvalidKey(
            "key must be exactly 26 unique A-Z letters".into(),
        ));
    }
    let mut perm = [0u8; 26];
    for (i, &b) in bytes.iter().enumerate() {
        let idx = letter_index(b as char).ok_or_else(|| {
            CipherError::InvalidKey("key must be exactly 26 unique A-Z letters".into())
        })?;
        if std::mem::replace(&mut seen[idx as usize], true) {
            return Err(CipherError::InvalidKey(format!(
                "key repeats the letter '{}'",
                b as char
            )));
        }
        perm[i] = b;
    }
    Ok(perm)
}

fn apply_permutation(text: &str, perm: &[u8; 26]) -> String {
    canonicalize(text)
        .chars()
        .map(|ch| match letter_index(ch) {
            Some(idx) => perm[idx as usize] as char,
            None => ch,
        })
        .collect()
}

pub fn substitution(text: &str, key: &str) -> Result<String> {
    let perm = permutation_key(key)?;
    Ok(apply_permutation(text, &perm))
}

/// Inverts the permutation and applies it.
pub fn substitution_decrypt(text: &str, key: &str) -> Result<String> {
    let perm = permutation_key(key)?;
    let mut inverse = [0u8; 26];
    for (i, &b) in perm.iter().enumerate() {
        inverse[(b - b'A') as usize] = b'A' + i as u8;
    }
    Ok(apply_permutation(text, &inverse))
}

pub fn keyboard_reverse(text: &str) -> String {
    apply_permutation(text, REVERSE_KEYBOARD)
}

/// Keyword square over the 25-letter alphabet (`J` folded into `I`),
/// keyword letters first, duplicates dropped.
fn keyed_square(key: &str) -> Result<Vec<char>> {
    let key = canonicalize(key).replace('J', "I");
    if key.chars().any(|c| letter_index(c).is_none()) {
        return Err(CipherError::InvalidKey("key must contain only A-Z letters".into()));
    }
    let mut square: Vec<char> = Vec::with_capacity(25);
    for ch in key.chars().chain(SQUARE_ALPHABET.chars()) {
        if !square.contains(&ch) {
            square.push(ch);
        }
    }
    Ok(square)
}

fn square_position(ch: char) -> Option<usize> {
    SQUARE_ALPHABET.find(ch)
}

/// Keyword substitution from the plain square onto the keyed square.
/// `J` has no slot in either and passes through.
pub fn slide(text: &str, key: &str) -> Result<String> {
    let square = keyed_square(key)?;
    Ok(canonicalize(text)
        .chars()
        .map(|ch| square_position(ch).map_or(ch, |idx| square[idx]))
        .collect())
}

/// Simplified Playfair: each letter becomes its successor in the keyed grid.
pub fn playfair(text: &str, key: &str) -> Result<String> {
    let key: String = canonicalize(key).chars().filter(char::is_ascii_uppercase).collect();
    let grid = keyed_square(&key)?;
    Ok(canonicalize(text)
        .replace('J', "I")
        .chars()
        .map(|ch| match grid.iter().position(|&g| g == ch) {
            Some(idx) => grid[(idx + 1) % grid.len()],
            None => ch,
        })
        .collect())
}

/// Digraph Four-Square. Only letters are kept; an odd tail is padded with `X`.
pub fn four_square(text: &str, key1: &str, key2: &str) -> Result<String> {
    let upper_right = keyed_square(key1)?;
    let lower_left = keyed_square(key2)?;
    let mut letters: Vec<usize> = canonicalize(text)
        .replace('J', "I")
        .chars()
        .filter_map(square_position)
        .collect();
    if letters.len() % 2 == 1 {
        letters.push(SQUARE_ALPHABET.len() - 3); // X
    }
    Ok(letters
        .chunks(2)
        .flat_map(|pair| {
            let (r1, c1) = (pair[0] / 5, pair[0] % 5);
            let (r2, c2) = (pair[1] / 5, pair[1] % 5);
            [upper_right[r1 * 5 + c2], lower_left[r2 * 5 + c1]]
        })
        .collect())
}

/// Swaps every adjacent pair of characters.
pub fn pair_swap(text: &str) -> String {
    let chars: Vec<char> = canonicalize(text).replace('J', "I").chars().collect();
    chars
        .chunks(2)
        .flat_map(|pair| pair.iter().rev().copied())
        .collect()
}

/// Renames letters in order of first appearance: first distinct letter
/// becomes `A`, the next `B`, ...
pub fn pattern_alphabet(text: &str) -> String {
    let mut pattern: HashMap<char, char> = HashMap::new();
    canonicalize(text)
        .chars()
        .map(|ch| {
            if letter_index(ch).is_none() {
                return ch;
            }
            let next = index_letter(pattern.len() as i64);
            *pattern.entry(ch).or_insert(next)
        })
        .collect()
}

/// Swaps the two most frequent letters (ties go to the earlier letter).
pub fn frequency_swap(text: &str) -> String {
    let text = canonicalize(text);
    let mut counts: Vec<(char, usize)> = Vec::new();
    for ch in text.chars().filter(|c| letter_index(*c).is_some()) {
        match counts.iter_mut().find(|(c, _)| *c == ch) {
            Some((_, n)) => *n += 1,
            None => counts.push((ch, 1)),
        }
    }
    if counts.len() < 2 {
        return text;
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let (first, second) = (counts[0].0, counts[1].0);
    text.chars()
        .map(|ch| {
            if ch == first {
                second
            } else if ch == second {
                first
            } else {
                ch
            }
        })
        .collect()
}

fn letter_map(text: &str, f: impl Fn(u8) -> String) -> String {
    canonicalize(text)
        .chars()
        .filter_map(letter_index)
        .map(f)
        .collect()
}

/// Two-digit letter numbers `01`..=`26`; non-letters are dropped.
pub fn homophonic(text: &str) -> String {
    letter_map(text, |idx| format!("{:02}", idx + 1))
}

pub fn phonetic_num(text: &str) -> String {
    homophonic(text)
}

pub fn pigpen(text: &str) -> String {
    canonicalize(text)
        .chars()
        .map(|ch| match letter_index(ch) {
            Some(idx) => PIGPEN[idx as usize].to_string(),
            None => ch.to_string(),
        })
        .collect()
}

/// NATO spelling, one word per input character.
pub fn phonetic(text: &str) -> String {
    canonicalize(text)
        .chars()
        .map(|ch| match letter_index(ch) {
            Some(idx) => NATO[idx as usize].to_string(),
            None => ch.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Space-separated Morse; characters without a code are dropped.
pub fn morse(text: &str) -> String {
    canonicalize(text)
        .chars()
        .filter_map(morse_code)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Row/column digits in the 5x5 square; non-letters pass through.
pub fn polybius(text: &str) -> String {
    canonicalize(text)
        .replace('J', "I")
        .chars()
        .map(|ch| match square_position(ch) {
            Some(idx) => format!("{}{}", idx / 5 + 1, idx % 5 + 1),
            None => ch.to_string(),
        })
        .collect()
}

/// 6x6 square covering letters and digits; anything else is dropped.
pub fn polybius_extended(text: &str) -> String {
    const GRID: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    canonicalize(text)
        .chars()
        .filter_map(|ch| GRID.find(ch))
        .map(|idx| format!("{}{}", idx / 6 + 1, idx % 6 + 1))
        .collect()
}

/// Bifid fractionation: all row coordinates, then all column coordinates,
/// re-paired into letters. Non-letters are dropped.
pub fn bifid(text: &str) -> String {
    let positions: Vec<usize> = canonicalize(text)
        .replace('J', "I")
        .chars()
        .filter_map(square_position)
        .collect();
    let coords: Vec<usize> = positions
        .iter()
        .map(|p| p / 5)
        .chain(positions.iter().map(|p| p % 5))
        .collect();
    let square: Vec<char> = SQUARE_ALPHABET.chars().collect();
    coords
        .chunks(2)
        .map(|pair| square[pair[0] * 5 + pair[1]])
        .collect()
}

/// Three base-3 digits per letter.
pub fn trifid(text: &str) -> String {
    letter_map(text, |v| format!("{}{}{}", v / 9, (v % 9) / 3, v % 3))
}

pub fn straddling_checkerboard(text: &str) -> String {
    letter_map(text, |idx| STRADDLING[idx as usize].to_string())
}

/// Morse stream of the letters, sampled every third symbol
/// (`-` becomes `A`, `.` becomes `B`).
pub fn fractionated_morse(text: &str) -> String {
    let stream: String = canonicalize(text)
        .chars()
        .filter(|c| letter_index(*c).is_some())
        .filter_map(morse_code)
        .collect();
    stream
        .chars()
        .step_by(3)
        .map(|sym| if sym == '-' { 'A' } else { 'B' })
        .collect()
}

/// Letters become the decimal index of their Atbash partner.
pub fn atbash_numeric(text: &str) -> String {
    canonicalize(text)
        .chars()
        .map(|ch| match letter_index(ch) {
            Some(idx) => (25 - idx).to_string(),
            None => ch.to_string(),
        })
        .collect()
}

/// `A=1`, `B=2`, ...; non-letters pass through.
pub fn number_sub(text: &str) -> String {
    canonicalize(text)
        .chars()
        .map(|ch| match letter_index(ch) {
            Some(idx) => (idx + 1).to_string(),
            None => ch.to_string(),
        })
        .collect()
}

pub fn letter_position(text: &str) -> String {
    canonicalize(text)
        .chars()
        .filter_map(letter_index)
        .map(|idx| (idx + 1).to_string())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn numeric_advanced(text: &str) -> String {
    canonicalize(text)
        .chars()
        .enumerate()
        .map(|(pos, ch)| match letter_index(ch) {
            Some(idx) => ((idx as usize + pos) % 26).to_string(),
            None => ch.to_string(),
        })
        .collect()
}

/// Vowels are replaced by their position in the text.
pub fn gap(text: &str) -> String {
    canonicalize(text)
        .chars()
        .enumerate()
        .map(|(pos, ch)| {
            if VOWELS.contains(ch) {
                pos.to_string()
            } else {
                ch.to_string()
            }
        })
        .collect()
}

pub fn consonant(text: &str) -> String {
    canonicalize(text).chars().filter(|c| !VOWELS.contains(*c)).collect()
}

pub fn vowel_only(text: &str) -> String {
    canonicalize(text).chars().filter(|c| VOWELS.contains(*c)).collect()
}

/// Upper case on even positions, lower case on odd ones.
pub fn mixed_case(text: &str) -> String {
    text.chars()
        .enumerate()
        .flat_map(|(i, ch)| -> Box<dyn Iterator<Item = char>> {
            if !ch.is_alphabetic() {
                Box::new(std::iter::once(ch))
            } else if i % 2 == 0 {
                Box::new(ch.to_uppercase())
            } else {
                Box::new(ch.to_lowercase())
            }
        })
        .collect()
}

pub fn prime(text: &str) -> String {
    letter_map(text, |idx| PRIMES[idx as usize % PRIMES.len()].to_string())
}

pub fn fibonacci(text: &str) -> String {
    letter_map(text, |idx| FIBONACCI[idx as usize % FIBONACCI.len()].to_string())
}

/// Run-length description: `AAB` becomes `2A1B`.
pub fn look_and_say(text: &str) -> String {
    let chars: Vec<char> = canonicalize(text).chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let run = chars[i..].iter().take_while(|&&c| c == chars[i]).count();
        out.push_str(&run.to_string());
        out.push(chars[i]);
        i += run;
    }
    out
}

/// Five `A`/`B` symbols per letter.
pub fn bacon(text: &str) -> String {
    letter_map(text, |idx| {
        (0..5)
            .rev()
            .map(|bit| if idx >> bit & 1 == 1 { 'B' } else { 'A' })
            .collect::<String>()
    })
}

/// Reads `A`/`B` symbols in groups of five. Anything else is ignored, as are
/// groups beyond `Z` and a trailing partial group.
pub fn bacon_decrypt(text: &str) -> String {
    let symbols: Vec<u8> = canonicalize(text)
        .chars()
        .filter_map(|c| match c {
            'A' => Some(0),
            'B' => Some(1),
            _ => None,
        })
        .collect();
    symbols
        .chunks_exact(5)
        .map(|group| group.iter().fold(0u8, |acc, bit| acc << 1 | bit))
        .filter(|&v| v < 26)
        .map(|v| (b'A' + v) as char)
        .collect()
}

pub fn leet_speak(text: &str) -> String {
    text.chars()
        .map(|ch| match ch.to_ascii_uppercase() {
            'A' => '4',
            'E' => '3',
            'I' | 'L' => '1',
            'O' => '0',
            'S' => '5',
            'T' => '7',
            _ => ch,
        })
        .collect()
}

/// Best-effort undo of [`leet_speak`]; `1` always reads back as `I`.
pub fn reverse_leet(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '4' => 'A',
            '3' => 'E',
            '1' => 'I',
            '0' => 'O',
            '5' => 'S',
            '7' => 'T',
            _ => ch,
        })
        .collect()
}

pub(crate) fn register(reg: &mut Registry) {
    const KEY: &[ParamSpec] = &[ParamSpec::text("key")];

    reg.register(
        CipherDescriptor::new(
            "substitution",
            "Substitution Cipher",
            "Map each letter to another through a 26-letter permutation key.",
            |t, p| substitution(t, &p.text_or("key", DEFAULT_SUBSTITUTION_KEY)),
        )
        .with_params(KEY)
        .with_decrypt(|t, p| substitution_decrypt(t, &p.text_or("key", DEFAULT_SUBSTITUTION_KEY))),
    );
    reg.register(
        CipherDescriptor::new(
            "substitution-custom",
            "Custom Substitution",
            "Substitution with a custom alphabet, encode only.",
            |t, p| substitution(t, &p.text_or("key", DEFAULT_SUBSTITUTION_KEY)),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "slide",
            "Slide Cipher",
            "Keyword substitution over a 25-letter square.",
            |t, p| slide(t, &p.text_or("key", "SECRET")),
        )
        .with_params(KEY),
    );
    reg.register(
        CipherDescriptor::new(
            "playfair",
            "Playfair Cipher",
            "Simplified Playfair: step to the next letter of a keyed 5x5 grid.",
            |t, p| playfair(t, &p.text_or("key", "PLAYFAIR")),
        )
        .with_params(KEY),
    );
    for (slug, name) in [("four-square", "Four-Square Cipher"), ("four-square-var", "Four-Square Variant")] {
        reg.register(
            CipherDescriptor::new(slug, name, "Digraph substitution across four 5x5 squares.", |t, p| {
                four_square(t, &p.text_or("key1", "EXAMPLE"), &p.text_or("key2", "CIPHER"))
            })
            .with_params(const { &[ParamSpec::text("key1"), ParamSpec::text("key2")] }),
        );
    }
    for (slug, name) in [
        ("straddling-checkerboard", "Straddling Checkerboard"),
        ("straddling-var", "Straddling Variant"),
    ] {
        reg.register(CipherDescriptor::new(
            slug,
            name,
            "Letters to one- and two-digit checkerboard codes.",
            plain(straddling_checkerboard),
        ));
    }
    reg.register(
        CipherDescriptor::new(
            "bacon",
            "Bacon Cipher",
            "Encode letters as five-symbol groups of A and B.",
            plain(bacon),
        )
        .with_decrypt(|t, _| Ok(bacon_decrypt(t))),
    );
    reg.register(
        CipherDescriptor::new(
            "leet-speak",
            "Leet Speak",
            "Swap letters for look-alike digits.",
            plain(leet_speak),
        )
        .with_lossy_decrypt(|t, _| Ok(reverse_leet(t))),
    );

    let fixed: [(&'static str, &'static str, &'static str, fn(&str) -> String); 25] = [
        ("keyboard-reverse", "Reverse Keyboard", "Map the alphabet onto a scrambled keyboard order.", keyboard_reverse),
        ("foursquare", "Four-Square (Pair Swap)", "Swap each pair of letters.", pair_swap),
        ("pattern-alphabet", "Pattern Alphabet", "Rename letters in order of first appearance.", pattern_alphabet),
        ("frequency-swap", "Frequency Swap", "Swap the two most frequent letters.", frequency_swap),
        ("homophonic", "Homophonic Substitution", "Two-digit number for every letter.", homophonic),
        ("pigpen", "Pigpen (Freemasonry)", "Grid-symbol substitution.", pigpen),
        ("phonetic", "NATO Phonetic Alphabet", "Spell the text with NATO code words.", phonetic),
        ("morse", "Morse Code", "Convert text to dots and dashes.", morse),
        ("polybius", "Polybius Square", "Convert letters to 5x5 grid coordinates.", polybius),
        ("polybius-extended", "Extended Polybius", "6x6 grid encoding of letters and digits.", polybius_extended),
        ("bifid", "Bifid Cipher", "Polybius coordinates fractionated and recombined.", bifid),
        ("trifid", "Trifid Cipher", "Three base-3 digits per letter.", trifid),
        ("fractionated-morse", "Fractionated Morse", "Morse code stream folded back into letters.", fractionated_morse),
        ("atbash-numeric", "Atbash Numeric", "Atbash with numeric output.", atbash_numeric),
        ("number-sub", "Number Substitution", "Replace each letter with its position (A=1, B=2, ...).", number_sub),
        ("letter-position", "Letter Position", "Dash-separated letter positions.", letter_position),
        ("phonetic-num", "Phonetic Number", "Two-digit letter positions.", phonetic_num),
        ("numeric-advanced", "Advanced Numeric", "Letter value plus position, as numbers.", numeric_advanced),
        ("gap", "Gap Cipher", "Replace vowels with their position.", gap),
        ("consonant", "Consonant Only", "Drop every vowel.", consonant),
        ("vowel-only", "Vowel Only", "Keep only the vowels.", vowel_only),
        ("mixed-case", "Mixed Case", "Alternate upper and lower case.", mixed_case),
        ("prime", "Prime Cipher", "Encode letters as prime numbers.", prime),
        ("fibonacci", "Fibonacci Cipher", "Encode letters as Fibonacci numbers.", fibonacci),
        ("look-and-say", "Look-and-Say Cipher", "Describe runs of repeated characters.", look_and_say),
    ];
    for (slug, name, description, f) in fixed {
        reg.register(CipherDescriptor::new(slug, name, description, plain(f)));
    }
}
