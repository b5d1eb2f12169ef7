//! # HTTP Client - Entry Point
//! src/main.rs
//!
//! Uso: `httpclient [GET|POST] <URL>`
//!
//! - GET imprime el body
//! - POST imprime la respuesta completa (código y body)
//! - `--json` imprime `{"code": ..., "body": ...}`
//!
//! Los logs van a stderr; stdout queda solo para la respuesta.

use httpclient::client::HttpClient;
use httpclient::config::Config;
use httpclient::http::{Method, Response};
use tracing_subscriber::EnvFilter;

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn render(operation: &str, response: &Response, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(response);
    }

    if operation == Method::POST.as_str() {
        Ok(response.to_string())
    } else {
        Ok(response.body().to_string())
    }
}

fn main() {
    // Sin argumentos clap imprime el uso y sale con código != 0
    let config = Config::new();
    init_logging(&config.log_level);

    if let Err(e) = config.validate() {
        eprintln!("Error de configuración: {}", e);
        std::process::exit(2);
    }

    let (operation, url) = config.target();
    let args = match config.form_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error de configuración: {}", e);
            std::process::exit(2);
        }
    };
    let args = (!args.is_empty()).then_some(args.as_slice());

    let client = HttpClient::with_options(config.client_options());

    match client.command(&url, &operation, args) {
        Ok(response) => match render(&operation, &response, config.json) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
