//! # Servidor HTTP de Pruebas
//! src/server/mod.rs
//!
//! Servidor local que usan los tests para validar al cliente. No forma parte
//! del pipeline del cliente: para el cliente es solo "algún endpoint TCP que
//! habla HTTP/1.1".
//!
//! ## Ejemplo
//!
//! ```
//! use httpclient::client::HttpClient;
//! use httpclient::http::Method;
//! use httpclient::server::{handlers, Router, Server};
//!
//! let router = Router::new().with(Method::GET, handlers::echo_path_get);
//! let handle = Server::bind("127.0.0.1:0", router).unwrap().spawn().unwrap();
//!
//! let response = HttpClient::new().get(&handle.url("hello"), None).unwrap();
//! assert_eq!(response.body(), "/hello");
//!
//! handle.shutdown();
//! ```

pub mod handlers;
pub mod incoming;
pub mod reply;
pub mod router;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use incoming::IncomingRequest;
pub use reply::Reply;
pub use router::{Handler, Router};
pub use tcp::{Server, ServerHandle};
