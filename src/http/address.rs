//! # Resolución de URLs
//! src/http/address.rs
//!
//! Convierte una URL en las tres piezas que necesita el cliente para abrir
//! el socket y armar la request line: host, path y puerto.
//!
//! ```text
//! http://127.0.0.1:27601/abcdef/gjkd?x=1
//!        └── host ──┘ └port┘└──── path ───┘
//! ```
//!
//! El scheme solo tiene que existir; no se usa para elegir el puerto.

use super::error::{HttpError, Result};
use ::url::{Host, Url};

/// Puerto por defecto cuando la URL no especifica uno
pub const DEFAULT_PORT: u16 = 80;

/// URL descompuesta en host, path y puerto
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Host sin corchetes (las IPv6 quedan listas para resolver)
    pub host: String,

    /// Path (siempre empieza con `/`), incluyendo la query original si existe
    pub path: String,

    /// Puerto (80 si no se especificó)
    pub port: u16,
}

/// Descompone una URL
///
/// # Errores
///
/// Retorna [`HttpError::Url`] si la URL no se puede parsear o no tiene host.
///
/// # Ejemplo
/// ```
/// use httpclient::http::resolve;
///
/// let parsed = resolve("http://example.com").unwrap();
/// assert_eq!(parsed.host, "example.com");
/// assert_eq!(parsed.path, "/");
/// assert_eq!(parsed.port, 80);
/// ```
pub fn resolve(url: &str) -> Result<ParsedUrl> {
    let parsed = Url::parse(url).map_err(|e| HttpError::Url {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let host = match parsed.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        _ => {
            return Err(HttpError::Url {
                url: url.to_string(),
                reason: "no host".to_string(),
            })
        }
    };

    let mut path = match parsed.path() {
        "" => "/".to_string(),
        p => p.to_string(),
    };

    // La query de la URL se conserva; los args del request se agregan después
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }

    // `Url` descarta el puerto si coincide con el default del scheme
    let port = match parsed.port() {
        Some(port) => port,
        None if has_explicit_port(url) => parsed.port_or_known_default().unwrap_or(DEFAULT_PORT),
        None => DEFAULT_PORT,
    };

    Ok(ParsedUrl { host, path, port })
}

/// Indica si la autoridad de `url` trae un `:<puerto>` explícito
fn has_explicit_port(url: &str) -> bool {
    let Some((_, rest)) = url.trim().split_once("://") else {
        return false;
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    // Saltar el literal IPv6 entre corchetes
    let after_host = match host_port.rfind(']') {
        Some(i) => &host_port[i + 1..],
        None => host_port,
    };

    match after_host.rsplit_once(':') {
        Some((_, port)) => !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
