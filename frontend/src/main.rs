//! Front-end entry point: loads settings, wires the backend client, and
//! serves the pages.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use frontend::inbound::http::health::HealthState;
use frontend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use frontend::outbound::ReqwestStashApiFactory;
use frontend::server::{ServerConfig, create_server};
use frontend::settings::StashSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = StashSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let api_url = settings.api_url().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let api = ReqwestStashApiFactory::new(api_url.as_str(), settings.request_timeout())
        .map_err(std::io::Error::other)?;
    info!(api_url = %api_url, "backend configured");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig::new(session, bind_addr, Arc::new(api)),
    )?;
    server.await
}
