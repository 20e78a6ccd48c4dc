use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use shoplite::config::AppConfig;
use shoplite::db;
use shoplite::state::AppState;
use shoplite::web::configure_app_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging.
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting shoplite server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Initialize the database pool
  let db_pool = match db::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if let Err(e) = db::ensure_schema(&db_pool).await {
    tracing::error!(error = %e, "Failed to initialize the database schema.");
    panic!("Database schema error: {}", e);
  }

  if app_config.seed_db {
    if let Err(e) = db::seed_products(&db_pool).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  // Cookie session key: derived from the configured secret, or random per
  // boot (which drops all sessions on restart).
  let session_key = match app_config.session_secret.as_deref() {
    Some(secret) => Key::derive_from(secret.as_bytes()),
    None => {
      tracing::warn!("SESSION_SECRET not set; using a volatile session key.");
      Key::generate()
    }
  };

  let app_state = AppState::new(db_pool, app_config.clone());

  // Configure and start the Actix Web server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(
        SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
          .cookie_name("shoplite_session".to_string())
          .cookie_secure(false) // Demo runs over plain HTTP
          .build(),
      )
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
