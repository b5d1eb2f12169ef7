//! # Construcción de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Arma byte a byte la request que se envía por el socket.
//!
//! ## Formato
//!
//! ```text
//! POST /path HTTP/1.1\r\n
//! Host: localhost\r\n
//! Connection: close\r\n
//! User-Agent: httpclient/0.1.0\r\n
//! Accept: */*\r\n
//! Content-Type: application/x-www-form-urlencoded\r\n
//! Content-Length: 9\r\n
//! \r\n
//! a=1&b=x+y
//! ```
//!
//! Exactamente una línea vacía separa headers y body, y no hay nada después
//! del body. Siempre se envía `Connection: close`: el cliente lee la respuesta
//! hasta que el servidor cierra.

use super::error::HttpError;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use url::form_urlencoded;

/// Content-Type de los bodies que genera el cliente
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - los args viajan en la query string
    GET,

    /// POST - los args viajan form-encoded en el body
    POST,
}

impl Method {
    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

impl FromStr for Method {
    type Err = HttpError;

    /// Parsea el nombre de una operación
    ///
    /// # Errores
    ///
    /// [`HttpError::UnsupportedOperation`] si no es GET ni POST
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            other => Err(HttpError::UnsupportedOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headers de la request en el orden exacto en que se escriben
pub type HeaderSet = Vec<(String, String)>;

/// Codifica pares clave/valor como `application/x-www-form-urlencoded`
///
/// # Ejemplo
/// ```
/// use httpclient::http::request::encode_form;
///
/// let args = vec![("q".to_string(), "hello world".to_string())];
/// assert_eq!(encode_form(&args), "q=hello+world");
/// ```
pub fn encode_form(args: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(args.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

/// Constructor de requests
///
/// Solo guarda el `User-Agent`; todo lo demás se calcula por request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    user_agent: String,
}

impl RequestBuilder {
    /// Crea un builder con el `User-Agent` indicado
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
        }
    }

    /// `User-Agent` que se envía en cada request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Headers de una request, en orden de serialización
    ///
    /// `body_len` es `None` si la request no lleva body. Un POST sin body
    /// igual declara `Content-Length: 0`. Los hosts IPv6 van entre corchetes.
    pub fn headers(&self, method: Method, host: &str, body_len: Option<usize>) -> HeaderSet {
        let host = if host.contains(':') {
            format!("[{}]", host)
        } else {
            host.to_string()
        };

        let mut headers: HeaderSet = vec![
            ("Host".to_string(), host),
            ("Connection".to_string(), "close".to_string()),
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept".to_string(), "*/*".to_string()),
        ];

        if method == Method::POST {
            match body_len {
                Some(len) => {
                    headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
                    headers.push(("Content-Length".to_string(), len.to_string()));
                }
                None => headers.push(("Content-Length".to_string(), "0".to_string())),
            }
        }

        headers
    }

    /// Arma la request completa lista para escribir en el socket
    ///
    /// - GET con args: `path?query`, sin body
    /// - POST con args: body form-encoded con su `Content-Length` exacto
    ///
    /// # Ejemplo
    /// ```
    /// use httpclient::http::{Method, RequestBuilder};
    ///
    /// let args = vec![("q".to_string(), "hello".to_string())];
    /// let bytes = RequestBuilder::default().build(Method::GET, "localhost", "/search", Some(&args));
    /// let text = String::from_utf8(bytes).unwrap();
    ///
    /// assert!(text.starts_with("GET /search?q=hello HTTP/1.1\r\n"));
    /// assert!(text.ends_with("\r\n\r\n"));
    /// ```
    pub fn build(
        &self,
        method: Method,
        host: &str,
        path: &str,
        args: Option<&[(String, String)]>,
    ) -> Vec<u8> {
        let query = args.filter(|a| !a.is_empty()).map(encode_form);

        let mut target = path.to_string();
        let mut body = None;

        match (method, query) {
            (Method::GET, Some(query)) => {
                // La URL puede traer su propia query
                target.push(if path.contains('?') { '&' } else { '?' });
                target.push_str(&query);
            }
            (Method::POST, Some(query)) => body = Some(query),
            (_, None) => {}
        }

        let headers = self.headers(method, host, body.as_ref().map(|b| b.len()));
        let header_block = headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\r\n");

        let mut request = format!("{} {} HTTP/1.1\r\n{}\r\n\r\n", method, target, header_block).into_bytes();
        if let Some(body) = body {
            request.extend_from_slice(body.as_bytes());
        }

        debug!(method = %method, path = %target, bytes = request.len(), "request armada");
        request
    }
}

impl Default for RequestBuilder {
    /// `User-Agent: httpclient/<versión>`
    fn default() -> Self {
        Self::new(concat!("httpclient/", env!("CARGO_PKG_VERSION")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build_text(method: Method, path: &str, pairs: Option<&[(&str, &str)]>) -> String {
        let owned = pairs.map(args);
        let bytes = RequestBuilder::new("test/1.0").build(method, "localhost", path, owned.as_deref());
        String::from_utf8(bytes).unwrap()
    }

    // ==================== Method ====================

    #[test]
    fn test_method_from_str() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::GET);
        assert_eq!("POST".parse::<Method>().unwrap(), Method::POST);
    }

    #[test]
    fn test_method_unsupported() {
        let result = "DELETE".parse::<Method>();
        assert!(matches!(result, Err(HttpError::UnsupportedOperation(op)) if op == "DELETE"));
    }

    #[test]
    fn test_method_is_case_sensitive() {
        assert!("get".parse::<Method>().is_err());
    }

    // ==================== GET ====================

    #[test]
    fn test_get_without_args() {
        let text = build_text(Method::GET, "/", None);
        assert_eq!(
            text,
            "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nUser-Agent: test/1.0\r\nAccept: */*\r\n\r\n"
        );
    }

    #[test]
    fn test_get_with_query() {
        let text = build_text(Method::GET, "/abcdef/gjkd/dsadas", Some(&[("q", "hello")]));
        assert!(text.starts_with("GET /abcdef/gjkd/dsadas?q=hello HTTP/1.1\r\n"));
        assert!(!text.contains("Content-Length"));
    }

    #[test]
    fn test_get_with_empty_args_leaves_path() {
        let text = build_text(Method::GET, "/x", Some(&[]));
        assert!(text.starts_with("GET /x HTTP/1.1\r\n"));
    }

    #[test]
    fn test_get_appends_to_existing_query() {
        let text = build_text(Method::GET, "/x?lang=es", Some(&[("q", "hello")]));
        assert!(text.starts_with("GET /x?lang=es&q=hello HTTP/1.1\r\n"));
    }

    #[test]
    fn test_get_query_is_percent_encoded() {
        let text = build_text(Method::GET, "/", Some(&[("q", "a b&c=d")]));
        assert!(text.starts_with("GET /?q=a+b%26c%3Dd HTTP/1.1\r\n"));
    }

    // ==================== POST ====================

    #[test]
    fn test_post_with_body() {
        let text = build_text(Method::POST, "/submit", Some(&[("a", "1"), ("b", "x y")]));
        assert_eq!(
            text,
            "POST /submit HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nUser-Agent: test/1.0\r\nAccept: */*\r\n\
             Content-Type: application/x-www-form-urlencoded\r\nContent-Length: 9\r\n\r\na=1&b=x+y"
        );
    }

    #[test]
    fn test_post_single_blank_line_before_body() {
        let text = build_text(Method::POST, "/", Some(&[("k", "v")]));
        assert_eq!(text.matches("\r\n\r\n").count(), 1);
        assert!(text.ends_with("\r\n\r\nk=v"));
    }

    #[test]
    fn test_post_content_length_counts_bytes() {
        // "ñ" ocupa 2 bytes en UTF-8 → %C3%B1
        let text = build_text(Method::POST, "/", Some(&[("n", "ñ")]));
        assert!(text.contains("Content-Length: 8\r\n"));
        assert!(text.ends_with("n=%C3%B1"));
    }

    #[test]
    fn test_post_without_args() {
        let text = build_text(Method::POST, "/", None);
        assert!(text.contains("Content-Length: 0\r\n"));
        assert!(!text.contains("Content-Type"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    // ==================== Headers ====================

    #[test]
    fn test_header_order() {
        let builder = RequestBuilder::new("ua");
        let names: Vec<String> = builder
            .headers(Method::POST, "h", Some(3))
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec!["Host", "Connection", "User-Agent", "Accept", "Content-Type", "Content-Length"]
        );
    }

    #[test]
    fn test_ipv6_host_header_is_bracketed() {
        let bytes = RequestBuilder::new("ua").build(Method::GET, "::1", "/", None);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\r\nHost: [::1]\r\n"));
    }

    #[test]
    fn test_default_user_agent() {
        let builder = RequestBuilder::default();
        assert!(builder.user_agent().starts_with("httpclient/"));
    }

    #[test]
    fn test_encode_form_preserves_order() {
        let encoded = encode_form(&args(&[("z", "1"), ("a", "2")]));
        assert_eq!(encoded, "z=1&a=2");
    }
}
