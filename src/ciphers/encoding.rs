//! Byte and codepoint encodings. These work on the raw text, not the
//! canonical uppercase form.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{CipherError, Result};
use crate::registry::{CipherDescriptor, Registry};

use super::plain;

pub fn base64_encode(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

pub fn base64_decode(text: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| CipherError::InvalidParameter(format!("invalid base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|_| CipherError::InvalidParameter("decoded base64 is not valid UTF-8".into()))
}

/// Lowercase hex of each codepoint, at least two digits wide.
pub fn hex(text: &str) -> String {
    text.chars().map(|c| format!("{:02x}", c as u32)).collect()
}

fn decode_groups(text: &str, width: usize, radix: u32, what: &str) -> Result<String> {
    let digits: Vec<char> = text.chars().collect();
    if digits.len() % width != 0 {
        return Err(CipherError::InvalidParameter(format!(
            "{what} input length must be a multiple of {width}"
        )));
    }
    digits
        .chunks(width)
        .map(|group| {
            let group: String = group.iter().collect();
            u32::from_str_radix(&group, radix)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| CipherError::InvalidParameter(format!("invalid {what} group '{group}'")))
        })
        .collect()
}

/// Decodes two hex digits at a time.
pub fn hex_decode(text: &str) -> Result<String> {
    decode_groups(text, 2, 16, "hex")
}

/// Eight binary digits per codepoint.
pub fn binary(text: &str) -> String {
    text.chars().map(|c| format!("{:08b}", c as u32)).collect()
}

pub fn binary_decode(text: &str) -> Result<String> {
    decode_groups(text, 8, 2, "binary")
}

pub fn unicode(text: &str) -> String {
    text.chars()
        .map(|c| format!("U+{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn octal(text: &str) -> String {
    text.chars().map(|c| format!("{:o}", c as u32)).collect()
}

/// Unpadded hex digits per codepoint.
pub fn hexadecimal(text: &str) -> String {
    text.chars().map(|c| format!("{:x}", c as u32)).collect()
}

/// RFC 4648 base32 of the UTF-8 bytes, with padding.
pub fn base32(text: &str) -> String {
    fast32::base32::RFC4648.encode(text.as_bytes())
}

pub(crate) fn register(reg: &mut Registry) {
    reg.register(
        CipherDescriptor::new(
            "base64",
            "Base64 Encoding",
            "Standard Base64 of the UTF-8 bytes. An encoding, not encryption.",
            plain(base64_encode),
        )
        .with_decrypt(|t, _| base64_decode(t)),
    );
    reg.register(
        CipherDescriptor::new(
            "hex",
            "Hexadecimal Encoding",
            "Each character as lowercase hex digits.",
            plain(hex),
        )
        .with_decrypt(|t, _| hex_decode(t)),
    );
    reg.register(
        CipherDescriptor::new(
            "binary",
            "Binary Encoding",
            "Each character as eight binary digits.",
            plain(binary),
        )
        .with_decrypt(|t, _| binary_decode(t)),
    );

    let fixed: [(&'static str, &'static str, &'static str, fn(&str) -> String); 5] = [
        ("unicode", "Unicode Codepoints", "Show each character's U+ codepoint.", unicode),
        ("octal", "Octal Encoding", "Each character as octal digits.", octal),
        ("hexadecimal", "Hexadecimal Codepoints", "Each character as unpadded hex digits.", hexadecimal),
        ("base64-variant", "Base64 Variant", "Base64 of the UTF-8 bytes, encode only.", base64_encode),
        ("base32", "Base32 Encoding", "RFC 4648 Base32 of the UTF-8 bytes.", base32),
    ];
    for (slug, name, description, f) in fixed {
        reg.register(CipherDescriptor::new(slug, name, description, plain(f)));
    }
}
