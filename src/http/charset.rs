//! # Decodificación de Bodies según Charset
//! src/http/charset.rs
//!
//! Convierte los bytes del body a `String` usando el charset declarado en
//! `Content-Type`. Nunca falla: las secuencias inválidas se reemplazan por
//! `U+FFFD` y los charsets desconocidos se decodifican como UTF-8.

use tracing::warn;

/// windows-1252 en 0x80..0x9F; `None` en las posiciones sin asignar
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

/// Familias de charsets que sabemos decodificar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    /// ISO-8859-1: cada byte es un code point
    Latin1,
    /// Latin-1 con imprimibles en 0x80..0x9F
    Windows1252,
    /// Bytes > 0x7F se reemplazan por `U+FFFD`
    Ascii,
    Utf16Le,
    Utf16Be,
    /// UTF-16 sin orden explícito: se detecta por BOM (big endian si no hay)
    Utf16,
}

impl Charset {
    /// Busca un charset por su nombre (sin distinguir mayúsculas)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Charset::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Some(Charset::Latin1),
            "windows-1252" | "cp1252" => Some(Charset::Windows1252),
            "us-ascii" | "ascii" => Some(Charset::Ascii),
            "utf-16le" => Some(Charset::Utf16Le),
            "utf-16be" => Some(Charset::Utf16Be),
            "utf-16" => Some(Charset::Utf16),
            _ => None,
        }
    }
}

/// Decodifica `bytes` con el charset `label` (UTF-8 si es `None` o desconocido)
///
/// # Ejemplo
/// ```
/// use httpclient::http::charset::decode;
///
/// assert_eq!(decode(b"caf\xe9", Some("ISO-8859-1")), "café");
/// assert_eq!(decode("café".as_bytes(), None), "café");
/// ```
pub fn decode(bytes: &[u8], label: Option<&str>) -> String {
    let charset = match label {
        None => Charset::Utf8,
        Some(label) => Charset::from_label(label).unwrap_or_else(|| {
            warn!(charset = label, "charset desconocido, decodificando como UTF-8");
            Charset::Utf8
        }),
    };

    match charset {
        Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        Charset::Windows1252 => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
        Charset::Ascii => bytes
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
            .collect(),
        Charset::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
        Charset::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
        Charset::Utf16 => match bytes {
            [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
            [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
            _ => decode_utf16(bytes, u16::from_be_bytes),
        },
    }
}

fn windows_1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WINDOWS_1252_HIGH[usize::from(byte - 0x80)].unwrap_or(char::REPLACEMENT_CHARACTER),
        _ => byte as char,
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let trailing = !chunks.remainder().is_empty();

    let mut text: String = char::decode_utf16(chunks.map(|pair| unit([pair[0], pair[1]])))
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();

    // Byte suelto al final
    if trailing {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}
