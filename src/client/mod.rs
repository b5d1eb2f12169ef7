//! # Módulo del Cliente
//! src/client/mod.rs
//!
//! - `tcp`: el socket de un request (connect, send-all, receive-until-close, close)
//! - `http_client`: la orquestación de un request completo

pub mod http_client;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use http_client::HttpClient;
pub use tcp::Connection;
