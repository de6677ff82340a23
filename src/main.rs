use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use tracing::{error, info};

mod api;
mod auth;
mod cli;
mod clock;
mod config;
mod db;
mod error;
mod listing;
mod logging;
mod patch;
mod shutdown;
#[cfg(test)]
mod testing;

use crate::api::auth::models::NewUser;
use crate::api::auth::AuthService;
use crate::api::state::AppServices;
use crate::auth::TokenService;
use crate::cli::{Cli, Command};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db::Repositories;
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let command = Cli::parse().command();

    // Load configuration from environment
    let config = Config::from_env().map_err(io::Error::other)?;

    logging::init(&config.log_dir)?;

    // Get database connection pool
    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            io::Error::other(e)
        })?;
    info!("Database connection pool established");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    match command {
        Command::Migrate => {
            db::migrations::run_migrations(&pool).await.map_err(|e| {
                error!("Failed to run database migrations: {}", e);
                io::Error::other(e)
            })?;
            pool.close().await;
            Ok(())
        }
        Command::CreateUser {
            username,
            email,
            password,
            role,
        } => {
            let repos = Repositories::postgres(pool.clone());
            let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.jwt_expiry_hours));
            let auth = AuthService::new(&repos, tokens, clock, config.request_timeout);
            let user = auth
                .create_user(NewUser {
                    username,
                    email,
                    password,
                    role,
                })
                .await
                .map_err(|e| io::Error::other(e.to_string()))?;
            println!("created {} account '{}' ({})", user.role, user.username, user.id);
            pool.close().await;
            Ok(())
        }
        Command::Serve => serve(config, pool, clock).await,
    }
}

async fn serve(config: Config, pool: sqlx::Pool<sqlx::Postgres>, clock: Arc<dyn Clock>) -> io::Result<()> {
    info!("Starting alumni-tracker");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Request timeout: {:?}", config.request_timeout);
    info!("  - Upload directory: {}", config.upload_dir.display());

    // Run migrations on startup
    db::migrations::run_migrations(&pool).await.map_err(|e| {
        error!("Failed to run database migrations: {}", e);
        io::Error::other(e)
    })?;

    std::fs::create_dir_all(&config.upload_dir)?;

    let services = AppServices::new(&config, Repositories::postgres(pool.clone()), clock);
    let max_payload_size = config.max_payload_size;
    let upload_dir = config.upload_dir.clone();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);
        let multipart_config = MultipartFormConfig::default().total_limit(max_payload_size);

        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .app_data(payload_config)
            .app_data(multipart_config)
            .configure(|cfg| services.configure(cfg))
            .service(actix_files::Files::new("/uploads", upload_dir.clone()))
    })
    .disable_signals();

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = server.bind((config.host.as_str(), config.port))?.run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}
