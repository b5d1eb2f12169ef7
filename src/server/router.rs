//! # Router del Servidor de Pruebas
//! src/server/router.rs
//!
//! Mapea cada método HTTP a un handler.
//!
//! ```text
//! IncomingRequest → Router → Handler → Reply
//! ```
//!
//! Si no hay handler para el método, retorna 405 Method Not Allowed.

use super::handlers;
use super::incoming::IncomingRequest;
use super::reply::Reply;
use crate::http::Method;

/// Tipo de función handler
///
/// Un handler recibe un request y retorna una respuesta
pub type Handler = fn(&IncomingRequest) -> Reply;

/// Router que mapea métodos a handlers
pub struct Router {
    routes: Vec<(Method, Handler)>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra el handler de un método (reemplaza al anterior si existía)
    ///
    /// # Ejemplo
    /// ```
    /// use httpclient::http::Method;
    /// use httpclient::server::{handlers, Router};
    ///
    /// let router = Router::new()
    ///     .with(Method::GET, handlers::echo_path_get)
    ///     .with(Method::POST, handlers::echo_post);
    /// ```
    pub fn register(&mut self, method: Method, handler: Handler) {
        self.routes.retain(|(m, _)| *m != method);
        self.routes.push((method, handler));
    }

    /// Versión encadenable de [`Router::register`]
    pub fn with(mut self, method: Method, handler: Handler) -> Self {
        self.register(method, handler);
        self
    }

    /// Ejecuta el handler del método del request
    pub fn route(&self, request: &IncomingRequest) -> Reply {
        let handler = self
            .routes
            .iter()
            .find(|(method, _)| method.as_str() == request.method())
            .map(|(_, handler)| *handler)
            .unwrap_or(handlers::die_on_method);

        let mut reply = handler(request);
        self.add_common_headers(&mut reply);
        reply
    }

    /// Agrega headers comunes a todas las respuestas
    fn add_common_headers(&self, reply: &mut Reply) {
        reply.add_header("Server", concat!("httpclient-testserver/", env!("CARGO_PKG_VERSION")));
        reply.add_header("Connection", "close");
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
