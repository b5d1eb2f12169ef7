//! # Errores del Cliente HTTP
//! src/http/error.rs
//!
//! Todos los fallos del pipeline (resolver → construir → conectar → enviar →
//! recibir → parsear) se reportan con [`HttpError`]. Ninguno termina el proceso:
//! es el llamador quien decide si reintentar, propagar o salir.
//!
//! Las búsquedas de headers y de charset NO son errores: retornan `Option`.

use std::io;

/// Errores que puede producir un request
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// La URL no tiene un host resoluble (o no se pudo parsear)
    #[error("Invalid URL '{url}': {reason}")]
    Url { url: String, reason: String },

    /// Falló la resolución DNS o el connect TCP
    #[error("Could not connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// La respuesta no tiene status line o separador headers/body parseable
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Operación distinta de GET o POST
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Expiró un deadline configurado de lectura/escritura
    #[error("Timed out while {0}")]
    Timeout(&'static str),

    /// Cualquier otro fallo de transporte al enviar o recibir
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl HttpError {
    /// Clasifica un error de socket ocurrido durante `context`.
    ///
    /// Los sockets con timeout reportan `WouldBlock` en Unix y `TimedOut`
    /// en Windows; ambos se tratan como [`HttpError::Timeout`].
    pub(crate) fn transport(context: &'static str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => HttpError::Timeout(context),
            _ => HttpError::Io { context, source },
        }
    }
}

/// Resultado de las operaciones del cliente
pub type Result<T> = std::result::Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_would_block_is_timeout() {
        let err = HttpError::transport("receiving", io::Error::from(io::ErrorKind::WouldBlock));
        assert!(matches!(err, HttpError::Timeout("receiving")));
    }

    #[test]
    fn test_transport_timed_out_is_timeout() {
        let err = HttpError::transport("sending", io::Error::from(io::ErrorKind::TimedOut));
        assert!(matches!(err, HttpError::Timeout("sending")));
    }

    #[test]
    fn test_transport_other_is_io() {
        let err = HttpError::transport("receiving", io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(matches!(err, HttpError::Io { context: "receiving", .. }));
    }

    #[test]
    fn test_display_messages() {
        let err = HttpError::UnsupportedOperation("DELETE".to_string());
        assert_eq!(err.to_string(), "Unsupported operation: DELETE");

        let err = HttpError::MalformedResponse("missing status line".to_string());
        assert_eq!(err.to_string(), "Malformed response: missing status line");

        let err = HttpError::Connect {
            host: "nowhere.invalid".to_string(),
            port: 80,
            source: io::Error::new(io::ErrorKind::NotFound, "no such host"),
        };
        assert!(err.to_string().contains("nowhere.invalid:80"));
    }
}
