//! # Blog Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::{Parser, Subcommand};
use tracing_actix_web::TracingLogger;

use blog_core::ports::RateLimiter;
use blog_infra::{InMemoryRateLimiter, RateLimitConfig};

mod config;
mod handlers;
mod middleware;
mod observability;
mod staff;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use staff::StaffAccount;
use state::AppState;
use telemetry::TelemetryConfig;

#[derive(Parser)]
#[command(name = "blog-server")]
#[command(about = "Multi-author blog JSON API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Create a staff account, or grant staff rights to an existing one
    CreateStaff {
        #[arg(long)]
        username: String,
        /// Needed when the account does not exist yet
        #[arg(long)]
        email: Option<String>,
        /// Needed when the account does not exist yet
        #[arg(long, env = "STAFF_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    let state = AppState::new(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Startup failed");
        io::Error::other(e)
    })?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, state).await,
        Command::CreateStaff {
            username,
            email,
            password,
        } => {
            if config.database.is_none() {
                return Err(io::Error::other(
                    "create-staff needs DATABASE_URL; the in-memory store is discarded on exit",
                ));
            }

            let account = StaffAccount {
                username,
                email,
                password,
            };
            let user = staff::grant_staff(&state, account).await.map_err(|e| {
                tracing::error!(error = %e, "create-staff failed");
                io::Error::other(e.to_string())
            })?;

            println!("{} is staff", user.username);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, state: AppState) -> io::Result<()> {
    tracing::info!("Starting blog server on {}:{}", config.host, config.port);

    let state = web::Data::new(state);

    let rate_limit = RateLimitConfig::from_env();
    tracing::info!(
        max_requests = rate_limit.max_requests,
        window_secs = rate_limit.window.as_secs(),
        "Rate limiting /auth"
    );
    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(rate_limit));

    HttpServer::new(move || {
        let limiter = limiter.clone();
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(state.clone())
            .app_data(handlers::json_config())
            .app_data(handlers::path_config())
            .configure(|cfg| handlers::configure_routes(cfg, limiter))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
