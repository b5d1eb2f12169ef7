//! # Parsing de Requests Entrantes
//! src/server/incoming.rs
//!
//! Parser HTTP/1.x mínimo para el servidor de pruebas.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /path?x=1 HTTP/1.1\r\n
//! Host: localhost\r\n
//! Content-Length: 3\r\n
//! \r\n
//! a=b
//! ```
//!
//! El servidor lee del socket hasta que [`is_complete`] es verdadero y
//! recién entonces llama a [`IncomingRequest::parse`].

use std::collections::HashMap;
use url::form_urlencoded;

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,

    /// Falta la línea vacía que cierra los headers
    #[error("Incomplete HTTP request")]
    IncompleteRequest,

    /// Formato inválido de la request line
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// Versión HTTP distinta de 1.0 / 1.1
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// Header sin ':'
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

/// Request recibido por el servidor de pruebas
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    /// Método tal como llegó (el router decide si lo soporta)
    method: String,

    /// Path con query incluida, tal como llegó en la request line
    path: String,

    version: String,

    /// Headers con nombre en minúsculas
    headers: HashMap<String, String>,

    body: Vec<u8>,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Valor de `Content-Length` en un bloque de headers (0 si no hay)
fn declared_length(head: &str) -> usize {
    head.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Indica si `buffer` ya contiene un request completo (headers + body)
pub fn is_complete(buffer: &[u8]) -> bool {
    match find(buffer, b"\r\n\r\n") {
        Some(end) => {
            let head = String::from_utf8_lossy(&buffer[..end]);
            buffer.len() >= (end + 4).saturating_add(declared_length(&head))
        }
        None => false,
    }
}

impl IncomingRequest {
    /// Parsea un request completo
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use httpclient::server::IncomingRequest;
    ///
    /// let raw = b"GET /abc?q=hello HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = IncomingRequest::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/abc?q=hello");
    /// assert_eq!(request.header("HOST"), Some("localhost"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ParseError::EmptyRequest);
        }

        let end = find(buffer, b"\r\n\r\n").ok_or(ParseError::IncompleteRequest)?;
        let head = std::str::from_utf8(&buffer[..end]).map_err(|_| ParseError::InvalidRequestLine)?;

        let mut lines = head.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::InvalidRequestLine)?;

        // METHOD PATH VERSION
        let parts: Vec<&str> = request_line.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        let mut headers = HashMap::new();
        for line in lines {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }

        let body_start = end + 4;
        let body_len = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(buffer.len() - body_start);
        let body_end = body_start.saturating_add(body_len).min(buffer.len());

        Ok(Self {
            method: parts[0].to_string(),
            path: parts[1].to_string(),
            version,
            headers,
            body: buffer[body_start..body_end].to_vec(),
        })
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene un header sin distinguir mayúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decodifica el body `application/x-www-form-urlencoded`
    ///
    /// Agrupa los valores por clave como hace `parse_qs`: `a=1&a=2` → `{"a": ["1", "2"]}`.
    /// Los pares con valor vacío se descartan.
    pub fn form(&self) -> HashMap<String, Vec<String>> {
        let mut form: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in form_urlencoded::parse(&self.body) {
            if value.is_empty() {
                continue;
            }
            form.entry(key.into_owned()).or_default().push(value.into_owned());
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let request = IncomingRequest::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_parse_keeps_query_in_path() {
        let request = IncomingRequest::parse(b"GET /abcdef/gjkd/dsadas?q=hello HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path(), "/abcdef/gjkd/dsadas?q=hello");
    }

    #[test]
    fn test_parse_headers_case_insensitive() {
        let raw = b"GET / HTTP/1.0\r\nHost: localhost:8080\r\nuser-agent: test\r\n\r\n";
        let request = IncomingRequest::parse(raw).unwrap();
        assert_eq!(request.header("host"), Some("localhost:8080"));
        assert_eq!(request.header("User-Agent"), Some("test"));
        assert_eq!(request.header("Content-Length"), None);
    }

    #[test]
    fn test_parse_post_body_and_form() {
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: 16\r\n\r\na=1&b=x+y&a=2&c=";
        let request = IncomingRequest::parse(raw).unwrap();
        assert_eq!(request.body(), b"a=1&b=x+y&a=2&c=");

        let form = request.form();
        assert_eq!(form["a"], vec!["1", "2"]);
        assert_eq!(form["b"], vec!["x y"]);
        assert!(!form.contains_key("c"));
    }

    #[test]
    fn test_parse_unknown_method_is_kept() {
        let request = IncomingRequest::parse(b"DELETE /x HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method(), "DELETE");
    }

    // ==================== Errores ====================

    #[test]
    fn test_empty_request() {
        assert_eq!(IncomingRequest::parse(b"").unwrap_err(), ParseError::EmptyRequest);
    }

    #[test]
    fn test_incomplete_request() {
        let result = IncomingRequest::parse(b"GET / HTTP/1.1\r\nHost: x\r\n");
        assert_eq!(result.unwrap_err(), ParseError::IncompleteRequest);
    }

    #[test]
    fn test_invalid_request_line() {
        let result = IncomingRequest::parse(b"GET\r\n\r\n");
        assert_eq!(result.unwrap_err(), ParseError::InvalidRequestLine);
    }

    #[test]
    fn test_invalid_version() {
        let result = IncomingRequest::parse(b"GET / HTTP/2.0\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidHttpVersion(_))));
    }

    #[test]
    fn test_invalid_header() {
        let result = IncomingRequest::parse(b"GET / HTTP/1.1\r\nnocolon\r\n\r\n");
        assert!(matches!(result, Err(ParseError::InvalidHeader(_))));
    }

    // ==================== Completitud ====================

    #[test]
    fn test_is_complete() {
        assert!(!is_complete(b"GET / HTTP/1.1\r\nHost: x"));
        assert!(is_complete(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"));
        assert!(!is_complete(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nab"));
        assert!(is_complete(b"POST / HTTP/1.1\r\ncontent-length: 5\r\n\r\nabcde"));
    }

    #[test]
    fn test_huge_content_length() {
        let raw = b"POST / HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\nabc";
        assert!(!is_complete(raw));

        let request = IncomingRequest::parse(raw).unwrap();
        assert_eq!(request.body(), b"abc");
    }
}
