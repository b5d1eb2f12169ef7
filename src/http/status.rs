//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos que conoce el crate. El cliente acepta cualquier código numérico
//! (ver [`crate::http::Response::code`]); este enum lo usa el servidor de
//! pruebas para escribir sus status lines.

/// Códigos de estado con nombre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok = 200,

    /// 204 No Content
    NoContent = 204,

    /// 400 Bad Request - falta un header obligatorio o el request está malformado
    BadRequest = 400,

    /// 404 Not Found
    NotFound = 404,

    /// 405 Method Not Allowed - el servidor no tiene handler para el método
    MethodNotAllowed = 405,

    /// 500 Internal Server Error
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use httpclient::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
