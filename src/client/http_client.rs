//! # Cliente HTTP
//! src/client/http_client.rs
//!
//! Orquesta un request completo:
//!
//! ```text
//! resolve → build → connect → send → receive → parse → close
//! ```
//!
//! Cada llamada es independiente: no hay estado compartido entre requests,
//! solo las opciones del cliente.

use super::tcp::Connection;
use crate::config::ClientOptions;
use crate::http::{resolve, Method, RequestBuilder, Response, Result};
use std::time::Instant;
use tracing::{debug, info};

/// Cliente HTTP/1.1 de un request por conexión
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    options: ClientOptions,
    builder: RequestBuilder,
}

impl HttpClient {
    /// Cliente sin timeouts y con el User-Agent por defecto
    pub fn new() -> Self {
        Self::with_options(ClientOptions::default())
    }

    /// Cliente con opciones explícitas
    pub fn with_options(options: ClientOptions) -> Self {
        let builder = RequestBuilder::new(&options.user_agent);
        Self { options, builder }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Ejecuta un request y retorna su [`Response`]
    ///
    /// El socket se cierra siempre, también cuando el envío, la lectura o el
    /// parsing fallan.
    ///
    /// # Errores
    ///
    /// - [`crate::http::HttpError::Url`] si la URL no tiene host
    /// - [`crate::http::HttpError::Connect`] si falla DNS o connect
    /// - [`crate::http::HttpError::Timeout`] / [`crate::http::HttpError::Io`] al enviar o recibir
    /// - [`crate::http::HttpError::MalformedResponse`] si la respuesta no se puede parsear
    pub fn request(&self, url: &str, method: Method, args: Option<&[(String, String)]>) -> Result<Response> {
        let start = Instant::now();

        let target = resolve(url)?;
        let request = self.builder.build(method, &target.host, &target.path, args);

        let mut connection = Connection::connect(&target.host, target.port, &self.options)?;
        let outcome = Self::exchange(&mut connection, &request);
        connection.close();

        let response = outcome?;
        info!(
            method = %method,
            url,
            code = response.code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request completado"
        );
        Ok(response)
    }

    fn exchange(connection: &mut Connection, request: &[u8]) -> Result<Response> {
        connection.send_all(request)?;
        let raw = connection.receive_all()?;
        debug!(peer = connection.peer(), bytes = raw.len(), "parseando respuesta");
        Response::parse(&raw)
    }

    /// GET; los args se agregan como query string
    pub fn get(&self, url: &str, args: Option<&[(String, String)]>) -> Result<Response> {
        self.request(url, Method::GET, args)
    }

    /// POST; los args se envían form-encoded en el body
    pub fn post(&self, url: &str, args: Option<&[(String, String)]>) -> Result<Response> {
        self.request(url, Method::POST, args)
    }

    /// Ejecuta una operación dada por nombre ("GET" o "POST")
    ///
    /// La operación se valida antes de cualquier I/O de red.
    ///
    /// # Ejemplo
    /// ```
    /// use httpclient::client::HttpClient;
    /// use httpclient::http::HttpError;
    ///
    /// let client = HttpClient::new();
    /// let result = client.command("http://127.0.0.1:9/", "DELETE", None);
    /// assert!(matches!(result, Err(HttpError::UnsupportedOperation(_))));
    /// ```
    pub fn command(&self, url: &str, operation: &str, args: Option<&[(String, String)]>) -> Result<Response> {
        let method = operation.parse::<Method>()?;
        self.request(url, method, args)
    }
}
