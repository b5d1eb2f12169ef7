//! # Módulo HTTP
//!
//! Implementa las piezas de protocolo del cliente HTTP/1.1 desde cero, sin
//! usar ninguna librería HTTP:
//!
//! - Resolución de URLs en host, path y puerto
//! - Construcción de requests (request line, headers en orden, body form-encoded)
//! - Parsing de responses (status, headers case-insensitive, charset, body)
//! - Errores tipados
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?q=hello HTTP/1.1\r\n
//! Host: localhost\r\n
//! Connection: close\r\n
//! User-Agent: httpclient/0.1.0\r\n
//! Accept: */*\r\n
//! \r\n
//! ```
//!
//! La respuesta se lee hasta que el servidor cierra la conexión.

pub mod address;   // URL → host, path, puerto
pub mod charset;   // Decodificación de bodies
pub mod error;     // Tipos de error
pub mod request;   // Construcción de requests
pub mod response;  // Parsing de responses
pub mod status;    // Códigos de estado HTTP

pub use address::{resolve, ParsedUrl};
pub use error::{HttpError, Result};
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use status::StatusCode;
