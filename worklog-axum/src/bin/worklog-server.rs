use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use clap::Parser;
use sqlx::SqlitePool;
use tracing::info;
use worklog::{GuardConfig, SqliteRepositoryProvider, Worklog};

/// Command line interface for the worklog server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(long, env = "WORKLOG_DB_URL", default_value = "sqlite:worklog.db?mode=rwc")]
    db_url: String,

    /// Address to listen on
    #[arg(long, env = "WORKLOG_LISTEN", default_value = "0.0.0.0:8000")]
    listen: SocketAddr,

    /// Seconds an address must wait after a failed login before retrying
    #[arg(long, default_value_t = 10)]
    block_cooldown_secs: i64,

    /// Failed logins after which an address is blocked for the process lifetime
    #[arg(long, default_value_t = 10)]
    max_failures: u32,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(clap::Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve,
    /// Run database migrations
    Migrate,
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,worklog=debug")),
        )
        .init();

    match cli.command {
        Commands::Migrate => {
            let pool = SqlitePool::connect(&cli.db_url).await?;
            let worklog = Worklog::new(Arc::new(SqliteRepositoryProvider::new(pool)));
            info!("Running migrations");
            worklog.migrate().await?;
            info!("Database migrations completed");
        }
        Commands::Version => {
            println!("worklog-server v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Serve => {
            let pool = SqlitePool::connect(&cli.db_url).await?;
            let repositories = Arc::new(SqliteRepositoryProvider::new(pool));

            let worklog = Worklog::new(repositories).with_guard_config(GuardConfig {
                block_cooldown: Duration::seconds(cli.block_cooldown_secs),
                max_failures_before_ban: cli.max_failures,
            });

            worklog.migrate().await?;
            info!("Database migrations completed");

            let app = worklog_axum::create_router(Arc::new(worklog));

            info!(listen = %cli.listen, "worklog server listening");
            info!("Available endpoints:");
            info!("  GET  /health    - Health check");
            info!("  POST /register  - Register new user");
            info!("  POST /logevent  - Append a work event (Basic auth)");
            info!("  GET  /logevent  - Read the shared event log (Basic auth)");

            let listener = tokio::net::TcpListener::bind(cli.listen).await?;
            // The connect-info service keeps the peer address available when
            // no forwarding proxy sets X-Forwarded-For.
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await?;
        }
    }

    Ok(())
}
