//! # Construcción de Respuestas del Servidor de Pruebas
//! src/server/reply.rs
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-type: text/plain\r\n
//! Content-Length: 7\r\n
//! \r\n
//! /hello
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use httpclient::http::StatusCode;
//! use httpclient::server::Reply;
//!
//! let reply = Reply::new(StatusCode::Ok)
//!     .with_header("Content-type", "text/plain")
//!     .with_body("/hello\n");
//!
//! let bytes = reply.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use crate::http::StatusCode;

/// Respuesta HTTP/1.1 del servidor de pruebas
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,

    /// Headers en orden de escritura
    headers: Vec<(String, String)>,

    body: Vec<u8>,
}

impl Reply {
    /// Respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header; si ya existe (sin distinguir mayúsculas) se reemplaza
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Reply::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Establece el body y su `Content-Length`
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        let len = self.body.len().to_string();
        self.add_header("Content-Length", &len);
        self
    }

    /// Respuesta JSON
    pub fn json(status: StatusCode, body: &str) -> Self {
        Self::new(status)
            .with_header("Content-type", "application/json")
            .with_body(body)
    }

    /// Serializa la respuesta: status line, headers, línea vacía y body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = format!("HTTP/1.1 {}\r\n", self.status).into_bytes();

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);
        result
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene un header sin distinguir mayúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Response;

    #[test]
    fn test_new_reply() {
        let reply = Reply::new(StatusCode::Ok);
        assert_eq!(reply.status(), StatusCode::Ok);
        assert!(reply.body().is_empty());
    }

    #[test]
    fn test_with_body_sets_length() {
        let reply = Reply::new(StatusCode::Ok).with_body("Hello World");
        assert_eq!(reply.body(), b"Hello World");
        assert_eq!(reply.header("content-length"), Some("11"));
    }

    #[test]
    fn test_header_replaced() {
        let reply = Reply::new(StatusCode::Ok)
            .with_header("Server", "a")
            .with_header("server", "b");
        assert_eq!(reply.header("Server"), Some("b"));
    }

    #[test]
    fn test_to_bytes_order() {
        let text = String::from_utf8(
            Reply::new(StatusCode::NotFound)
                .with_header("Content-type", "text/plain")
                .with_body("Test")
                .to_bytes(),
        )
        .unwrap();

        assert_eq!(
            text,
            "HTTP/1.1 404 Not Found\r\nContent-type: text/plain\r\nContent-Length: 4\r\n\r\nTest"
        );
    }

    #[test]
    fn test_client_parses_reply() {
        // Lo que escribe el servidor lo entiende el parser del cliente
        let bytes = Reply::json(StatusCode::BadRequest, r#"["No Host header found"]"#).to_bytes();
        let response = Response::parse(&bytes).unwrap();
        assert_eq!(response.code(), 400);
        assert_eq!(response.body(), r#"["No Host header found"]"#);
    }
}
