//! # Parsing de Respuestas HTTP/1.1
//! src/http/response.rs
//!
//! Separa los bytes crudos recibidos del socket en status code, bloque de
//! headers y body.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n            ← status line (hasta el primer \r\n)
//! Content-Type: text/plain\r\n   ┐
//! Content-Length: 5\r\n          ┘ bloque de headers (hasta el primer \r\n\r\n)
//! \r\n
//! hello                          ← body (hasta que el servidor cierra)
//! ```
//!
//! Las funciones que buscan headers o charset son totales: un header ausente
//! es un caso normal y se representa con `None`. Solo la falta de status line
//! o de separador es un error ([`HttpError::MalformedResponse`]).

use super::charset;
use super::error::{HttpError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

const CRLF: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";

/// Resultado de un request: status code y body decodificado
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    code: u16,
    body: String,
}

impl Response {
    /// Crea una respuesta
    pub fn new(code: u16, body: String) -> Self {
        Self { code, body }
    }

    /// Parsea una respuesta completa
    ///
    /// # Ejemplo
    /// ```
    /// use httpclient::http::Response;
    ///
    /// let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n/hello\n";
    /// let response = Response::parse(raw).unwrap();
    ///
    /// assert_eq!(response.code(), 200);
    /// assert_eq!(response.body(), "/hello");
    /// ```
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let code = parse_status(raw)?;
        let header_block = parse_header_block(raw)?;
        let charset = parse_charset(&header_block);
        let body = parse_body(raw, charset.as_deref())?;

        Ok(Self { code, body })
    }

    /// Status code de la respuesta
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Body decodificado y sin espacios al inicio/final
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for Response {
    /// Formato: código en la primera línea y luego el body
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.code, self.body)
    }
}

/// Busca la primera ocurrencia de `needle` en `haystack`
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Extrae el status code de la status line
///
/// La status line son los bytes antes del primer `\r\n`; el código es el
/// segundo token separado por espacios.
pub fn parse_status(raw: &[u8]) -> Result<u16> {
    let end = find(raw, CRLF)
        .ok_or_else(|| HttpError::MalformedResponse("missing status line".to_string()))?;
    let status_line = String::from_utf8_lossy(&raw[..end]);

    let token = status_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| HttpError::MalformedResponse(format!("no status code in '{}'", status_line)))?;

    token
        .parse::<u16>()
        .map_err(|_| HttpError::MalformedResponse(format!("invalid status code '{}'", token)))
}

/// Extrae el bloque de headers (status line incluida), sin espacios extremos
pub fn parse_header_block(raw: &[u8]) -> Result<String> {
    let end = find(raw, HEADER_END)
        .ok_or_else(|| HttpError::MalformedResponse("missing header/body separator".to_string()))?;

    Ok(String::from_utf8_lossy(&raw[..end]).trim().to_string())
}

/// Headers de una respuesta con búsqueda case-insensitive
///
/// Si un header aparece repetido, gana la última ocurrencia.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: HashMap<String, String>,
}

impl HeaderMap {
    /// Construye el mapa a partir de un bloque de headers
    ///
    /// Descarta la status line y las líneas sin `": "`.
    pub fn parse(header_block: &str) -> Self {
        let entries = header_block
            .split("\r\n")
            .skip(1)
            .filter_map(|line| line.split_once(": "))
            .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
            .collect();

        Self { entries }
    }

    /// Obtiene un header sin distinguir mayúsculas
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Busca un header en el bloque; `None` si no existe
///
/// # Ejemplo
/// ```
/// use httpclient::http::response::lookup_header;
///
/// let block = "HTTP/1.1 200 OK\r\nContent-Type: text/html";
/// assert_eq!(lookup_header(block, "content-type").as_deref(), Some("text/html"));
/// assert_eq!(lookup_header(block, "X-Missing"), None);
/// ```
pub fn lookup_header(header_block: &str, name: &str) -> Option<String> {
    HeaderMap::parse(header_block).get(name).map(str::to_string)
}

/// Extrae el parámetro `charset` de `Content-Type`; `None` si no hay
pub fn parse_charset(header_block: &str) -> Option<String> {
    let content_type = lookup_header(header_block, "Content-Type")?;

    let param = content_type
        .split(';')
        .find(|param| param.to_ascii_lowercase().contains("charset"))?;

    let (_, value) = param.split_once('=')?;
    let value = value.trim().trim_matches('"').trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Extrae y decodifica el body (UTF-8 si `encoding` es `None`), sin espacios extremos
pub fn parse_body(raw: &[u8], encoding: Option<&str>) -> Result<String> {
    let start = find(raw, HEADER_END)
        .ok_or_else(|| HttpError::MalformedResponse("missing header/body separator".to_string()))?;

    let body = &raw[start + HEADER_END.len()..];
    Ok(charset::decode(body, encoding).trim().to_string())
}
