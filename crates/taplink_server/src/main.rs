//! Headless API server entrypoint.

use taplink_core::DEFAULT_PORT;
use taplink_server::{config::Config, db::Database, serve_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" => flags.help = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taplink=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;
    let state = AppState::new(config.clone(), database);

    let allow_public = taplink_server::config::env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = taplink_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("TapLink running at http://{}", actual_addr);
    tracing::info!("Visitor routes served under {}/t/<tag-uid>", config.base_url);

    serve_router(listener, state, allow_public, shutdown_signal()).await?;

    Ok(())
}

fn print_help() {
    println!("TapLink Server\n");
    println!("Usage: taplink-server [OPTIONS]\n");
    println!("Options:");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database path (default: ~/.cache/taplink/db)");
    println!(
        "  PORT              Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  BASE_URL          Public base URL used in tag registration responses");
    println!("  MAX_CONTENT_SIZE  Maximum request body size in bytes (default: 2MB)");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
