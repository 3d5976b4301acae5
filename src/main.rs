mod api;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod state;
mod utils;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware::Compress, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::database::{MongoComplaintStore, MongoUserStore, MongoDB};
use crate::services::AmqpPublisher;
use crate::state::AppState;

fn startup_error(context: &str, e: impl std::fmt::Display) -> io::Error {
    log::error!("❌ {}: {}", context, e);
    io::Error::other(format!("{}: {}", context, e))
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    log::info!("🚀 Starting Complaint Portal ({})...", config.env);
    log::info!("📊 Database: {}", config.mongodb_database);

    // Initialize MongoDB connection
    let db = MongoDB::new(&config.mongodb_uri, &config.mongodb_database)
        .await
        .map_err(|e| startup_error("Failed to connect to MongoDB", e))?;
    log::info!("✅ MongoDB connected successfully");

    let publisher = AmqpPublisher::connect(&config.amqp_url)
        .await
        .map_err(|e| startup_error("Failed to connect to message broker", e))?;

    let users = Arc::new(MongoUserStore::new(&db));

    // 🌱 Seed bootstrap admin
    if let Some(admin) = &config.seed_admin {
        seeds::admin_seed::seed_admin(users.as_ref(), admin, config.bcrypt_cost).await;
    }

    let state = AppState::new(
        &config,
        users,
        Arc::new(MongoComplaintStore::new(&db)),
        Arc::new(publisher),
    );
    let state_data = web::Data::new(state.clone());
    let tokens = state.tokens.clone();

    if config.allowed_origins.is_empty() {
        log::warn!("⚠️ ALLOWED_ORIGINS is empty, cross-origin requests will be rejected");
    }
    let allowed_origins = config.allowed_origins.clone();

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(middleware::SecurityHeaders)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .configure(|cfg| api::configure(cfg, &tokens))
    })
    .client_request_timeout(config.request_timeout)
    .keep_alive(Duration::from_secs(120))
    .shutdown_timeout(30)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
