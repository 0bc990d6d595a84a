use clap::Parser;
use log::info;
use scicalc::Evaluator;
use std::error::Error;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Serve the scientific calculator API.
#[derive(Debug, Parser)]
#[command(name = "scicalc", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "SCICALC_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,
    /// Log filter, e.g. `info` or `scicalc=debug,tower_http=debug`.
    #[arg(long, env = "SCICALC_LOG", default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log)?)
        .init();

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, scicalc::server::router(Evaluator::new()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("shutting down");
}
