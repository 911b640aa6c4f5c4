//! Imtihan · Exam Paper Composition Backend
//!
//! - Axum HTTP API over a pure composition engine
//! - Immutable in-memory question bank (TOML file + built-in seeds)
//! - Bilingual (English/Urdu) paper rendering model
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   BANK_CONFIG_PATH  : path to TOML question bank
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod seeds;
mod bank;
mod state;
mod protocol;
mod bilingual;
mod layout;
mod select;
mod distribute;
mod marks;
mod compose;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (the immutable bank snapshot).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "imtihan_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
