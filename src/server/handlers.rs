//! # Handlers del Servidor de Pruebas
//! src/server/handlers.rs
//!
//! Cada handler reproduce un comportamiento de servidor contra el que se
//! valida el cliente:
//! - `nothing_available`: siempre 404
//! - `echo_path_get`: repite el path (con query) como texto plano
//! - `echo_post`: repite el formulario recibido como JSON
//! - `header_check`: 400 si falta `Host`
//! - `die_on_method`: siempre 405
//! - `post_header_check`: 400 si falta `Host` o `Content-Length`

use super::incoming::IncomingRequest;
use super::reply::Reply;
use crate::http::StatusCode;
use std::collections::BTreeMap;

/// Siempre responde 404
pub fn nothing_available(_req: &IncomingRequest) -> Reply {
    Reply::new(StatusCode::NotFound)
        .with_header("Content-type", "text/plain")
        .with_body("File not found")
}

/// Repite el path recibido
///
/// # Ejemplo de response
/// ```text
/// /abcdef/gjkd/dsadas?q=hello
/// ```
pub fn echo_path_get(req: &IncomingRequest) -> Reply {
    Reply::new(StatusCode::Ok)
        .with_header("Content-type", "text/plain")
        .with_body(&format!("{}\n", req.path()))
}

/// Repite el formulario del body como JSON
///
/// # Ejemplo de response
/// ```json
/// {"a": ["aaaaaaaaaaaaa"], "b": ["bbbbbbbbbbbbbbbbbbbbbb"]}
/// ```
pub fn echo_post(req: &IncomingRequest) -> Reply {
    // Orden estable de claves en el JSON
    let form: BTreeMap<String, Vec<String>> = req.form().into_iter().collect();

    match serde_json::to_string(&form) {
        Ok(body) => Reply::json(StatusCode::Ok, &body),
        Err(e) => Reply::json(
            StatusCode::InternalServerError,
            &serde_json::json!({ "error": e.to_string() }).to_string(),
        ),
    }
}

/// Lista de errores como JSON (`[]` si no hubo)
fn errors_reply(status: StatusCode, errors: &[&str]) -> Reply {
    Reply::json(status, &serde_json::json!(errors).to_string())
}

/// 200 si el request trae `Host`, 400 si no
pub fn header_check(req: &IncomingRequest) -> Reply {
    let mut status = StatusCode::Ok;
    let mut errors = Vec::new();

    if req.header("Host").is_none() {
        status = StatusCode::BadRequest;
        errors.push("No Host header found");
    }

    errors_reply(status, &errors)
}

/// Siempre responde 405
pub fn die_on_method(req: &IncomingRequest) -> Reply {
    let mut errors = vec!["Method Not Allowed"];
    if req.header("Host").is_none() {
        errors.push("No Host header found");
    }

    errors_reply(StatusCode::MethodNotAllowed, &errors)
}

/// 200 si el request trae `Host` y `Content-Length`, 400 si no
pub fn post_header_check(req: &IncomingRequest) -> Reply {
    let mut status = StatusCode::Ok;
    let mut errors = Vec::new();

    if req.header("Host").is_none() {
        status = StatusCode::BadRequest;
        errors.push("No Host header found");
    }
    if req.header("Content-Length").is_none() {
        status = StatusCode::BadRequest;
        errors.push("No Content-Length header found");
    }

    errors_reply(status, &errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &[u8]) -> IncomingRequest {
        IncomingRequest::parse(raw).unwrap()
    }

    fn body_json(reply: &Reply) -> serde_json::Value {
        serde_json::from_slice(reply.body()).unwrap()
    }

    #[test]
    fn test_nothing_available() {
        let reply = nothing_available(&request(b"GET / HTTP/1.1\r\n\r\n"));
        assert_eq!(reply.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_echo_path_get() {
        let reply = echo_path_get(&request(b"GET /abc/def?q=hello HTTP/1.1\r\n\r\n"));
        assert_eq!(reply.status(), StatusCode::Ok);
        assert_eq!(reply.body(), b"/abc/def?q=hello\n");
        assert_eq!(reply.header("Content-type"), Some("text/plain"));
    }

    #[test]
    fn test_echo_post() {
        let reply = echo_post(&request(b"POST / HTTP/1.1\r\nContent-Length: 11\r\n\r\na=1&b=x+y&a"));
        assert_eq!(reply.status(), StatusCode::Ok);

        let json = body_json(&reply);
        assert_eq!(json["a"], serde_json::json!(["1"]));
        assert_eq!(json["b"], serde_json::json!(["x y"]));
    }

    #[test]
    fn test_header_check() {
        let ok = header_check(&request(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"));
        assert_eq!(ok.status(), StatusCode::Ok);
        assert_eq!(body_json(&ok), serde_json::json!([]));

        let missing = header_check(&request(b"GET / HTTP/1.1\r\n\r\n"));
        assert_eq!(missing.status(), StatusCode::BadRequest);
        assert_eq!(body_json(&missing), serde_json::json!(["No Host header found"]));
    }

    #[test]
    fn test_die_on_method() {
        let reply = die_on_method(&request(b"PUT / HTTP/1.1\r\n\r\n"));
        assert_eq!(reply.status(), StatusCode::MethodNotAllowed);
        assert_eq!(
            body_json(&reply),
            serde_json::json!(["Method Not Allowed", "No Host header found"])
        );
    }

    #[test]
    fn test_post_header_check() {
        let ok = post_header_check(&request(b"POST / HTTP/1.1\r\nHost: x\r\nContent-Length: 0\r\n\r\n"));
        assert_eq!(ok.status(), StatusCode::Ok);

        let missing = post_header_check(&request(b"POST / HTTP/1.1\r\nHost: x\r\n\r\n"));
        assert_eq!(missing.status(), StatusCode::BadRequest);
        assert_eq!(body_json(&missing), serde_json::json!(["No Content-Length header found"]));
    }
}
