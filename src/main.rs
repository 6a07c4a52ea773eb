use app::{AppState, create_app};
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use config::{Args, ConfigError, Settings};
use database::{SqliteDatabaseError, Store};
use std::io;
use std::process::ExitCode;
use thiserror::Error;

mod app;
mod config;
mod database;
mod error;
mod models;
mod report;
mod routes;

#[derive(Debug, Error)]
enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Could not open weather database: {0}")]
    Database(#[from] SqliteDatabaseError),
    #[error("Server failed: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), StartupError> {
    let settings = Settings::load(args)?;

    log::info!("opening database {}", settings.database_path.display());
    let store = Store::open(&settings.database_path).await?;

    let app = create_app(AppState { store });

    log::info!("listening on {}", settings.address);
    if let Some(tls) = settings.tls {
        log::info!(
            "using tls with key file {} and cert file {}",
            tls.key_file_path.display(),
            tls.cert_file_path.display()
        );
        let tls_config = RustlsConfig::from_pem_file(tls.cert_file_path, tls.key_file_path).await?;
        axum_server::bind_rustls(settings.address, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        axum_server::bind(settings.address)
            .serve(app.into_make_service())
            .await?;
    }
    Ok(())
}
