//! # HTTP Client
//! src/lib.rs
//!
//! Cliente HTTP/1.1 mínimo implementado desde cero sobre sockets TCP, sin
//! ninguna librería HTTP: arma la request line y los headers a mano, envía
//! los bytes por un socket y parsea la respuesta cruda.
//!
//! ## Arquitectura
//!
//! - `http`: piezas del protocolo (URLs, requests, responses, errores)
//! - `client`: el socket de un request y la orquestación completa
//! - `config`: opciones del cliente y argumentos del CLI
//! - `server`: servidor HTTP/1.1 local para los tests
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use httpclient::client::HttpClient;
//!
//! let client = HttpClient::new();
//! let args = vec![("q".to_string(), "hello".to_string())];
//! let response = client.get("http://127.0.0.1:8080/search", Some(&args))?;
//!
//! println!("{} {}", response.code(), response.body());
//! # Ok::<(), httpclient::http::HttpError>(())
//! ```

pub mod client;
pub mod config;
pub mod http;
pub mod server;
