//! Integer-sequence shift ciphers.
//!
//! Each letter `x` at position `i` is shifted by `table[(x + i) % len] % 26`.

use crate::alphabet::{ALPHABET_LEN, map_letters};
use crate::registry::{CipherDescriptor, Registry};

const fn fibonacci_like<const N: usize>(a: u64, b: u64) -> [u64; N] {
    let mut out = [0; N];
    out[0] = a;
    out[1] = b;
    let mut i = 2;
    while i < N {
        out[i] = out[i - 1] + out[i - 2];
        i += 1;
    }
    out
}

const fn tribonacci_like<const N: usize>(a: u64, b: u64, c: u64) -> [u64; N] {
    let mut out = [0; N];
    out[0] = a;
    out[1] = b;
    out[2] = c;
    let mut i = 3;
    while i < N {
        out[i] = out[i - 1] + out[i - 2] + out[i - 3];
        i += 1;
    }
    out
}

/// Parity of the binary digit sum, scaled to a half-alphabet shift.
const fn thue_morse<const N: usize>() -> [u64; N] {
    let mut out = [0; N];
    let mut i = 0;
    while i < N {
        out[i] = (i.count_ones() % 2) as u64 * 13;
        i += 1;
    }
    out
}

const FIBONACCI: [u64; 28] = fibonacci_like(1, 1);
const LUCAS: [u64; 28] = fibonacci_like(2, 1);
const TRIBONACCI: [u64; 29] = tribonacci_like(0, 0, 1);
const THUE_MORSE: [u64; 2048] = thue_morse();

/// Shifts every letter by the table entry selected by its value and position.
pub fn sequence_shift(text: &str, table: &[u64]) -> String {
    map_letters(text, |pos, x| {
        let entry = table[(x as usize + pos) % table.len()];
        x + (entry % ALPHABET_LEN as u64) as i64
    })
}

const SEQUENCES: [(&str, &str, &[u64]); 26] = [
    ("fibonacci-extended", "Extended Fibonacci", &FIBONACCI),
    ("lucas", "Lucas Cipher", &LUCAS),
    ("tribonacci", "Tribonacci Cipher", &TRIBONACCI),
    ("catalan", "Catalan Cipher", &[1, 1, 2, 5, 14, 42, 132, 429, 1430, 4862]),
    ("bell", "Bell Number Cipher", &[1, 1, 2, 5, 15, 52, 203, 877, 4140, 21147]),
    ("stirling", "Stirling Cipher", &[1, 1, 1, 2, 3, 5, 8, 13, 21, 34]),
    ("partition", "Partition Cipher", &[1, 1, 2, 3, 5, 7, 11, 15, 22, 30]),
    ("mersenne", "Mersenne Cipher", &[2, 3, 5, 7, 13, 17, 19, 31, 61, 89]),
    ("fermat", "Fermat Cipher", &[3, 5, 17, 257, 65537]),
    ("twin-prime", "Twin Prime Cipher", &[3, 5, 11, 13, 17, 19, 29, 31, 41, 43]),
    ("sophie-germain", "Sophie Germain Cipher", &[2, 3, 5, 11, 23, 29, 41, 53, 83, 89]),
    ("perfect-number", "Perfect Number Cipher", &[6, 28, 496, 8128]),
    ("abundant", "Abundant Number Cipher", &[12, 18, 20, 24, 30, 36, 40, 42, 48, 54]),
    ("deficient", "Deficient Number Cipher", &[1, 2, 3, 4, 5, 7, 8, 9, 10, 11]),
    ("harshad", "Harshad Cipher", &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
    ("kaprekar", "Kaprekar Cipher", &[1, 9, 45, 55, 99, 297, 703, 999, 2223, 2728]),
    ("armstrong", "Armstrong Cipher", &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
    ("happy-number", "Happy Number Cipher", &[1, 7, 10, 13, 19, 23, 28, 31, 32, 44]),
    ("sad-number", "Sad Number Cipher", &[2, 3, 4, 5, 6, 8, 9, 11, 12, 14]),
    ("palindromic", "Palindromic Number Cipher", &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
    ("repdigit", "Repdigit Cipher", &[1, 11, 111, 1111, 11111, 111111]),
    ("pell", "Pell Cipher", &[0, 1, 2, 5, 12, 29, 70, 169, 408, 985]),
    ("padovan", "Padovan Cipher", &[1, 1, 1, 2, 2, 3, 4, 5, 7, 9]),
    ("moser", "Moser-de Bruijn Cipher", &[0, 1, 4, 5, 16, 17, 20, 21, 64, 65]),
    ("golomb", "Golomb Cipher", &[1, 2, 2, 3, 3, 4, 4, 4, 5, 5]),
    ("thue-morse", "Thue-Morse Cipher", &THUE_MORSE),
];

pub(crate) fn register(reg: &mut Registry) {
    for (slug, name, table) in SEQUENCES {
        let description = format!(
            "Shift each letter by a term of the {} sequence.",
            name.trim_end_matches(" Cipher")
        );
        reg.register(CipherDescriptor::new(slug, name, description, move |t, _| {
            Ok(sequence_shift(t, table))
        }));
    }
}
