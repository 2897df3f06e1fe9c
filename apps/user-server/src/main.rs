//! REST API server for user records.
//!
//! Parses configuration, opens the store, and serves the `/user` API
//! until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use user_db_api::{config::ApiConfig, router::Router, server::Server};
use user_db_core::{config::DbConfig, Database, DbError};

/// Command-line arguments for the user server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Snapshot directory; the store is kept in memory when omitted
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Request body read timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = 64 * 1024)]
    max_body_bytes: usize,

    /// Send the envelope status as the HTTP status instead of always 200
    #[arg(long)]
    align_status_codes: bool,

    /// Retry attempts for transient I/O errors while writing snapshots
    #[arg(long, default_value_t = 3)]
    persistence_max_retries: u32,

    /// Delay between snapshot write retries in milliseconds
    #[arg(long, default_value_t = 100)]
    persistence_retry_delay_ms: u64,
}

impl Args {
    fn db_config(&self) -> DbConfig {
        DbConfig {
            data_dir: self.data_dir.clone(),
            persistence_max_retries: self.persistence_max_retries,
            persistence_retry_delay_ms: self.persistence_retry_delay_ms,
        }
    }

    fn api_config(&self) -> ApiConfig {
        ApiConfig {
            request_timeout_ms: self.request_timeout_ms,
            max_body_bytes: self.max_body_bytes,
            align_status_codes: self.align_status_codes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    let db = match Database::open(&args.db_config()) {
        Ok(db) => Arc::new(db),
        Err(DbError::DataCorruption(msg)) => {
            tracing::error!("Snapshot corruption detected: {}", msg);
            tracing::error!("Server cannot start. Restore the snapshot from backup or move it aside.");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to open user store"),
    };

    let router = Router::new(db, Arc::new(args.api_config()));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let server = Server::bind(addr, router)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Starting user server...");
    tracing::info!("  Address: {}", server.local_addr()?);
    match &args.data_dir {
        Some(dir) => tracing::info!("  Data directory: {}", dir.display()),
        None => tracing::info!("  Data directory: none (in-memory store)"),
    }
    tracing::info!("  Request timeout: {} ms", args.request_timeout_ms);
    tracing::info!("  Align status codes: {}", args.align_status_codes);

    // Serve until Ctrl+C
    server
        .serve_with_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl_c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    tracing::info!("Shutting down server...");
    Ok(())
}
