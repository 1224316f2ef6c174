pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

use anyhow::Context;
use clap::Parser;

pub use config::Config;
use db::{Store, StoreError};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = cli::Cli::parse();

    match cli.command.unwrap_or(cli::Commands::Serve) {
        cli::Commands::Serve => run_server(config).await,

        cli::Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists.");
            }
            Ok(())
        }

        cli::Commands::CreateAdmin {
            username,
            password,
            no_admin,
        } => cmd_create_admin(&config, &username, password, no_admin).await,

        cli::Commands::SetPassword { username, password } => {
            cmd_set_password(&config, &username, password).await
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!(
        "Storekeep v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let port = config.server.port;
    let state = web::create_app_state_from_config(config, prometheus_handle).await?;
    let app = web::router(state).await;

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Admin panel running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Error listening for shutdown: {err}");
        return;
    }
    info!("Shutdown signal received");
}

async fn cmd_create_admin(
    config: &Config,
    username: &str,
    password: Option<String>,
    no_admin: bool,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };

    if password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let store = Store::new(&config.general.database_path).await?;
    let user = store
        .create_user(username, &password, !no_admin, &config.security)
        .await?;

    println!(
        "✓ Created user '{}' (admin: {})",
        user.username,
        if user.is_admin { "yes" } else { "no" }
    );
    Ok(())
}

async fn cmd_set_password(
    config: &Config,
    username: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("New password: ")?,
    };

    if password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let store = Store::new(&config.general.database_path).await?;
    match store
        .set_user_password(username, &password, &config.security)
        .await
    {
        Ok(()) => {
            println!("✓ Password updated for '{username}'");
            Ok(())
        }
        Err(StoreError::NotFound) => {
            println!("User '{username}' not found.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    use std::io::Write;

    print!("{label}");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
