#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for address standardization.
//!
//! Accepts a CSV, text, or xlsx upload as multipart form data, enriches
//! it with standardized address columns, stores the result as CSV and xlsx
//! in the upload directory, and serves both back for download.

mod handlers;

use addrstd_address_models::StandardizeOptions;
use addrstd_server_models::ServerConfig;
use actix_web::{App, HttpServer, middleware, web};

pub use handlers::sanitize_filename;

/// Shared application state.
pub struct AppState {
    /// Environment-driven settings.
    pub config: ServerConfig,
    /// Options passed to every row.
    pub options: StandardizeOptions,
}

impl AppState {
    /// Builds state from `config`, applying its maps base URL override.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let mut options = StandardizeOptions::default();
        if let Some(url) = &config.maps_base_url {
            options.maps_base_url.clone_from(url);
        }
        Self { config, options }
    }
}

/// Headers added to every response.
#[must_use]
pub fn security_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("X-XSS-Protection", "1; mode=block"))
        .add((
            "Strict-Transport-Security",
            "max-age=31536000; includeSubDomains",
        ))
}

/// Registers the `/api` routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/upload", web::post().to(handlers::upload))
            .route("/download/{filename}", web::get().to(handlers::download)),
    );
}

/// Starts the address standardization server.
///
/// Logging must already be initialized. This is a regular async function;
/// the caller provides the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the upload directory cannot be
/// created, or the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.upload_dir)?;
    log::info!("Storing processed files in {}", config.upload_dir.display());

    let bind_addr = config.bind_addr.clone();
    let port = config.port;
    let state = web::Data::new(AppState::new(config));

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(security_headers())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
