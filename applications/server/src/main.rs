/// Botkeeper Server - user and interaction records for a chat bot
use botkeeper_core::UserFilter;
use botkeeper_server::{
    config::{ServerConfig, StorageBackend},
    create_router,
    services::{self, collect_stats},
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "botkeeper-server")]
#[command(about = "Chat bot user and interaction record service", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml if present)
    #[arg(short, long, global = true, env = "BOTKEEPER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Print aggregate statistics once
    Stats,
    /// List all users
    ListUsers,
    /// Create the MongoDB indexes and exit
    EnsureIndexes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "botkeeper_server=info,botkeeper_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await?,
        Commands::Stats => print_stats(&config).await?,
        Commands::ListUsers => list_users(&config).await?,
        Commands::EnsureIndexes => ensure_indexes(&config).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Botkeeper Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!(
        "Storage: {} (database {})",
        config.storage.backend.as_str(),
        config.storage.database_name
    );

    // Open the store once; every handler shares it through the state
    let app_state = services::open_store(&config.storage).await;

    let app = create_router(app_state.clone());

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app_state.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received terminate signal"),
    }
}

async fn print_stats(config: &ServerConfig) -> anyhow::Result<()> {
    let app_state = services::open_store(&config.storage).await;
    let stats = collect_stats(app_state.store()?, Utc::now()).await;
    app_state.close().await;

    println!("{}", serde_json::to_string_pretty(&stats?)?);
    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let app_state = services::open_store(&config.storage).await;
    let store = app_state.store()?;

    let users = store.list_users().await?;
    let total = store.count_users(UserFilter::All).await?;
    app_state.close().await;

    println!("Users ({}):", total);
    for user in users {
        let name = user
            .username
            .as_deref()
            .or(user.first_name.as_deref())
            .unwrap_or("-");
        println!("  {} - {}", user.user_id, name);
    }

    Ok(())
}

async fn ensure_indexes(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.backend != StorageBackend::Mongodb {
        anyhow::bail!("ensure-indexes requires the mongodb storage backend");
    }

    let store = services::open_mongo(&config.storage).await?;
    botkeeper_storage::ensure_indexes(&store).await?;
    tracing::info!("Indexes created on {}", config.storage.database_name);

    Ok(())
}
