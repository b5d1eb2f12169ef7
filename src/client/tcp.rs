//! # Conexión TCP de un Request
//! src/client/tcp.rs
//!
//! Cada request abre exactamente un socket, lo usa para enviar la request y
//! leer la respuesta completa, y lo cierra. No hay reutilización ni pool.
//!
//! El cierre es idempotente y nunca falla; además se ejecuta en `Drop`, así
//! que el socket se libera en cualquier camino de salida (éxito, error de
//! parsing o error de red).

use crate::config::ClientOptions;
use crate::http::{HttpError, Result};
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use tracing::{debug, warn};

/// Tamaño de cada lectura del socket
const CHUNK_SIZE: usize = 1024;

/// Socket de un único request
#[derive(Debug)]
pub struct Connection {
    stream: Option<TcpStream>,
    peer: String,
}

impl Connection {
    /// Resuelve `host` y abre la conexión TCP
    ///
    /// Prueba cada dirección que devuelve el DNS en orden hasta que una
    /// conecte. Aplica los timeouts configurados en `options`.
    ///
    /// # Errores
    ///
    /// [`HttpError::Connect`] si falla la resolución o ninguna dirección conecta.
    pub fn connect(host: &str, port: u16, options: &ClientOptions) -> Result<Self> {
        let connect_error = |source: io::Error| HttpError::Connect {
            host: host.to_string(),
            port,
            source,
        };

        let addrs: Vec<_> = (host, port).to_socket_addrs().map_err(connect_error)?.collect();

        let mut last_error = io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses");
        let mut connected = None;

        for addr in &addrs {
            debug!(%addr, "conectando");
            let attempt = match options.connect_timeout.filter(|t| !t.is_zero()) {
                Some(timeout) => TcpStream::connect_timeout(addr, timeout),
                None => TcpStream::connect(addr),
            };

            match attempt {
                Ok(stream) => {
                    connected = Some(stream);
                    break;
                }
                Err(e) => {
                    debug!(%addr, error = %e, "intento de conexión fallido");
                    last_error = e;
                }
            }
        }

        let stream = connected.ok_or_else(|| connect_error(last_error))?;

        // Cero significa sin límite
        let read_timeout = options.read_timeout.filter(|t| !t.is_zero());
        let write_timeout = options.write_timeout.filter(|t| !t.is_zero());
        stream.set_read_timeout(read_timeout).map_err(connect_error)?;
        stream.set_write_timeout(write_timeout).map_err(connect_error)?;

        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| format!("{}:{}", host, port));
        debug!(peer = %peer, "conexión establecida");

        Ok(Self {
            stream: Some(stream),
            peer,
        })
    }

    /// Dirección del peer (para logging)
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Indica si el socket sigue abierto
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn stream(&mut self, context: &'static str) -> Result<&mut TcpStream> {
        self.stream.as_mut().ok_or_else(|| HttpError::Io {
            context,
            source: io::Error::new(io::ErrorKind::NotConnected, "connection already closed"),
        })
    }

    /// Escribe la request completa
    ///
    /// `write_all` reintenta hasta que el transporte acepta todos los bytes.
    pub fn send_all(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream("sending request")?;

        stream
            .write_all(data)
            .map_err(|e| HttpError::transport("sending request", e))?;
        stream
            .flush()
            .map_err(|e| HttpError::transport("sending request", e))?;

        debug!(bytes = data.len(), "request enviada");
        Ok(())
    }

    /// Lee hasta que el peer cierra la conexión
    ///
    /// Correcto solo porque toda request declara `Connection: close`.
    pub fn receive_all(&mut self) -> Result<Vec<u8>> {
        let stream = self.stream("receiving response")?;

        let mut buffer = Vec::new();
        let mut chunk = [0u8; CHUNK_SIZE];

        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HttpError::transport("receiving response", e)),
            }
        }

        debug!(bytes = buffer.len(), "respuesta recibida");
        Ok(buffer)
    }

    /// Cierra el socket; llamadas repetidas no hacen nada
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            // El peer puede haber cerrado primero: NotConnected es normal aquí
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                if e.kind() != io::ErrorKind::NotConnected {
                    warn!(peer = %self.peer, error = %e, "error al cerrar la conexión");
                }
            }
            debug!(peer = %self.peer, "conexión cerrada");
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
