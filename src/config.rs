//! # Configuración del Cliente
//! src/config.rs
//!
//! Dos niveles de configuración:
//!
//! - [`ClientOptions`]: lo que necesita la librería (timeouts y User-Agent).
//! - [`Config`]: argumentos del CLI con soporte para variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./httpclient http://127.0.0.1:8080/status
//! ./httpclient POST http://127.0.0.1:8080/submit --arg a=1 --arg b=2 \
//!   --connect-timeout-ms 2000 \
//!   --read-timeout-ms 5000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_CLIENT_READ_TIMEOUT_MS=5000 HTTP_CLIENT_LOG=debug ./httpclient http://example.com
//! ```

use crate::http::Method;
use clap::Parser;
use std::time::Duration;

/// Opciones de un [`crate::client::HttpClient`]
///
/// Sin timeouts por defecto: connect y read bloquean hasta que el peer
/// responda o cierre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Deadline para establecer la conexión TCP
    pub connect_timeout: Option<Duration>,

    /// Deadline de cada lectura del socket
    pub read_timeout: Option<Duration>,

    /// Deadline de cada escritura al socket
    pub write_timeout: Option<Duration>,

    /// Valor del header `User-Agent`
    pub user_agent: String,
}

impl ClientOptions {
    /// Un timeout de cero equivale a no tener límite
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = non_zero(timeout);
        self
    }

    /// Un timeout de cero equivale a no tener límite
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = non_zero(timeout);
        self
    }

    /// Un timeout de cero equivale a no tener límite
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = non_zero(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

/// Los sockets rechazan un timeout de cero
fn non_zero(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            user_agent: concat!("httpclient/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Argumentos del CLI
///
/// Uso: `httpclient [GET|POST] <URL>`. Con un solo argumento posicional se
/// hace GET sobre esa URL.
#[derive(Debug, Clone, Parser)]
#[command(name = "httpclient")]
#[command(about = "Cliente HTTP/1.1 mínimo (GET y POST) sobre sockets TCP")]
#[command(version)]
pub struct Config {
    /// Operación (GET o POST), o la URL si se omite la operación
    #[arg(value_name = "GET|POST|URL")]
    pub first: String,

    /// URL cuando el primer argumento es la operación
    #[arg(value_name = "URL")]
    pub second: Option<String>,

    /// Argumento `clave=valor` (query string en GET, body en POST); repetible
    #[arg(short, long = "arg", value_name = "KEY=VALUE")]
    pub args: Vec<String>,

    /// Timeout de conexión en milisegundos (0 = sin límite)
    #[arg(long = "connect-timeout-ms", default_value = "0", env = "HTTP_CLIENT_CONNECT_TIMEOUT_MS")]
    pub connect_timeout_ms: u64,

    /// Timeout de lectura en milisegundos (0 = sin límite)
    #[arg(long = "read-timeout-ms", default_value = "0", env = "HTTP_CLIENT_READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Valor del header User-Agent
    #[arg(long = "user-agent", env = "HTTP_CLIENT_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Imprime la respuesta completa como JSON ({"code": ..., "body": ...})
    #[arg(long)]
    pub json: bool,

    /// Filtro de logging (error, warn, info, debug, trace o directivas de tracing)
    #[arg(long = "log-level", default_value = "warn", env = "HTTP_CLIENT_LOG")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Operación y URL a partir de los argumentos posicionales
    ///
    /// La operación se devuelve tal cual; se valida al ejecutar el request.
    pub fn target(&self) -> (String, String) {
        match &self.second {
            Some(url) => (self.first.clone(), url.clone()),
            None => (Method::GET.as_str().to_string(), self.first.clone()),
        }
    }

    /// Parsea los `--arg clave=valor` conservando el orden
    pub fn form_args(&self) -> Result<Vec<(String, String)>, String> {
        self.args
            .iter()
            .map(|pair| {
                pair.split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .ok_or_else(|| format!("Invalid argument '{}': expected KEY=VALUE", pair))
            })
            .collect()
    }

    /// Opciones de cliente derivadas de los flags
    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::default();

        if self.connect_timeout_ms > 0 {
            options = options.with_connect_timeout(Duration::from_millis(self.connect_timeout_ms));
        }
        if self.read_timeout_ms > 0 {
            let timeout = Duration::from_millis(self.read_timeout_ms);
            options = options.with_read_timeout(timeout).with_write_timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            options = options.with_user_agent(user_agent);
        }

        options
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        let (_, url) = self.target();
        if url.trim().is_empty() {
            return Err("URL must not be empty".to_string());
        }

        if let Some(user_agent) = &self.user_agent {
            if user_agent.trim().is_empty() || user_agent.contains(['\r', '\n']) {
                return Err("User-Agent must be a single non-empty line".to_string());
            }
        }

        self.form_args()?;

        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto: GET sobre localhost
    fn default() -> Self {
        Self {
            first: "http://127.0.0.1:8080/".to_string(),
            second: None,
            args: Vec::new(),
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            user_agent: None,
            json: false,
            log_level: "warn".to_string(),
        }
    }
}
