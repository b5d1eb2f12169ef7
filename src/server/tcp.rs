//! # Servidor TCP de Pruebas
//! src/server/tcp.rs
//!
//! Servidor HTTP/1.1 local para ejercitar al cliente. El accept loop corre en
//! un thread propio y cada conexión se procesa en su propio thread: se lee un
//! request completo, se responde y se cierra el socket.

use super::incoming::{self, IncomingRequest};
use super::reply::Reply;
use super::router::Router;
use crate::http::StatusCode;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tope para no esperar eternamente a un cliente que no termina su request
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Servidor ligado a un puerto, aún sin aceptar conexiones
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
}

impl Server {
    /// Abre el listener (usar `127.0.0.1:0` para un puerto efímero)
    pub fn bind(address: &str, router: Router) -> io::Result<Self> {
        let listener = TcpListener::bind(address)?;
        info!(address = %listener.local_addr()?, "servidor de pruebas escuchando");

        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Arranca el accept loop en segundo plano
    pub fn spawn(self) -> io::Result<ServerHandle> {
        let addr = self.listener.local_addr()?;
        let shutdown = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&shutdown);
        let thread = thread::spawn(move || self.run(&flag));

        Ok(ServerHandle {
            addr,
            shutdown,
            thread: Some(thread),
        })
    }

    fn run(self, shutdown: &AtomicBool) {
        for stream in self.listener.incoming() {
            if shutdown.load(Ordering::SeqCst) {
                break;
            }

            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, &router) {
                            warn!(error = %e, "error atendiendo conexión");
                        }
                    });
                }
                Err(e) => warn!(error = %e, "error al aceptar conexión"),
            }
        }
        debug!("accept loop terminado");
    }

    /// Lee hasta tener el request completo o hasta que el peer cierre
    fn read_request(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];

        while !incoming::is_complete(&buffer) {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);
        }

        Ok(buffer)
    }

    fn handle_connection(mut stream: TcpStream, router: &Router) -> io::Result<()> {
        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let buffer = Self::read_request(&mut stream)?;
        if buffer.is_empty() {
            debug!("conexión cerrada sin datos");
            return Ok(());
        }

        let reply = match IncomingRequest::parse(&buffer) {
            Ok(request) => {
                debug!(method = request.method(), path = request.path(), "request recibido");
                router.route(&request)
            }
            Err(e) => {
                warn!(error = %e, "request inválido");
                Reply::json(
                    StatusCode::BadRequest,
                    &serde_json::json!({ "error": format!("Invalid: {}", e) }).to_string(),
                )
            }
        };

        stream.write_all(&reply.to_bytes())?;
        stream.flush()?;
        debug!(status = %reply.status(), "respuesta enviada");

        Ok(())
    }
}

/// Servidor corriendo en segundo plano
///
/// Se detiene con [`ServerHandle::shutdown`] o al salir de scope.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL absoluta para `path` en este servidor
    ///
    /// `path` no debe empezar con `/`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path)
    }

    /// Detiene el accept loop y espera al thread
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.shutdown.store(true, Ordering::SeqCst);
            // Despierta al accept bloqueado
            let _ = TcpStream::connect(self.addr);
            if thread.join().is_err() {
                warn!("el thread del servidor terminó con panic");
            }
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::server::handlers;
    use std::net::Shutdown;

    fn roundtrip(handle: &ServerHandle, raw: &[u8]) -> String {
        let mut client = TcpStream::connect(handle.addr()).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn start(router: Router) -> ServerHandle {
        Server::bind("127.0.0.1:0", router).unwrap().spawn().unwrap()
    }

    #[test]
    fn test_echo_path_roundtrip() {
        let handle = start(Router::new().with(Method::GET, handlers::echo_path_get));
        let text = roundtrip(&handle, b"GET /abc?q=1 HTTP/1.1\r\nHost: x\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("\r\n\r\n/abc?q=1\n"));
        handle.shutdown();
    }

    #[test]
    fn test_waits_for_declared_body() {
        let handle = start(Router::new().with(Method::POST, handlers::echo_post));

        // El body llega en una segunda escritura
        let mut client = TcpStream::connect(handle.addr()).unwrap();
        client
            .write_all(b"POST / HTTP/1.1\r\nHost: x\r\nContent-Length: 3\r\n\r\n")
            .unwrap();
        thread::sleep(Duration::from_millis(50));
        client.write_all(b"k=v").unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        let text = String::from_utf8_lossy(&buf);

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with(r#"{"k":["v"]}"#));
        handle.shutdown();
    }

    #[test]
    fn test_parse_error_is_400() {
        let handle = start(Router::new());
        let text = roundtrip(&handle, b"\x00\x01\x02\x03garbage\r\n\r\n");

        assert!(text.contains("400 Bad Request"));
        assert!(text.contains("Invalid:"));
        handle.shutdown();
    }

    #[test]
    fn test_unregistered_method_is_405() {
        let handle = start(Router::new());
        let text = roundtrip(&handle, b"GET / HTTP/1.1\r\n\r\n");
        assert!(text.contains("405 Method Not Allowed"));
        handle.shutdown();
    }

    #[test]
    fn test_peer_closed_immediately() {
        let handle = start(Router::new());
        drop(TcpStream::connect(handle.addr()).unwrap());

        // El servidor sigue atendiendo
        let text = roundtrip(&handle, b"GET / HTTP/1.1\r\n\r\n");
        assert!(text.contains("405"));
        handle.shutdown();
    }

    #[test]
    fn test_url() {
        let handle = start(Router::new());
        assert_eq!(handle.url("a/b"), format!("http://{}/a/b", handle.addr()));
    }
}
