use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

use job_tracker::api::{
    auth::TokenVerifier,
    health::health_config,
    job_application::{JobApplicationService, job_application_config},
    middleware::{cors, request_logger},
    validation,
};
use job_tracker::config::Config;
use job_tracker::db::{self, PgJobApplicationRepository};

mod cli;
mod shutdown;
use crate::cli::{Cli, Command};
use crate::shutdown::ShutdownCoordinator;

/// Console output plus daily rotating files per level, e.g.
/// `logs/info.log.2025-01-01`, `logs/error.log.2025-01-01`.
fn init_tracing(log_dir: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "info.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "warn.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "error.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "debug.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    // `init` also installs the `log` bridge, so actix's access log lands here.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    Ok(())
}

fn to_io(err: impl std::error::Error + Send + Sync + 'static) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let Config {
        database_url,
        jwt_secret,
        jwt_audience,
        host,
        port,
        max_db_connections,
        max_payload_size,
        log_dir,
        cors_allowed_origin,
    } = Config::from_env().map_err(to_io)?;

    init_tracing(&log_dir)?;

    info!("Starting job-tracker");
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);
    info!(
        "  - Token audience: {}",
        jwt_audience.as_deref().unwrap_or("(not checked)")
    );
    info!("  - CORS allowed origin: {}", cors_allowed_origin);

    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .map_err(to_io)?;
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool).await.map_err(to_io)?;

    if let Command::Migrate = cli.command() {
        pool.close().await;
        return Ok(());
    }

    let repository = Arc::new(PgJobApplicationRepository::new(pool.clone()));
    let job_service = web::Data::new(JobApplicationService::new(repository));
    let verifier = web::Data::new(TokenVerifier::new(
        jwt_secret.as_bytes(),
        jwt_audience.as_deref(),
    ));
    let server_pool = web::Data::new(pool.clone());

    let server = HttpServer::new(move || {
        // The last wrap is outermost: preflights answered by CORS are logged too.
        App::new()
            .wrap(cors(&cors_allowed_origin))
            .wrap(request_logger())
            .app_data(server_pool.clone())
            .app_data(job_service.clone())
            .app_data(verifier.clone())
            .app_data(validation::json_config().limit(max_payload_size))
            .configure(health_config)
            .configure(job_application_config)
    })
    .bind((host.as_str(), port))?
    .run();

    info!("Server listening on http://{}:{}", host, port);

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}
