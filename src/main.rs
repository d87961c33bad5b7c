use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quicknotes::api;
use quicknotes::cli::{self, NoteCommand};
use quicknotes::config::AppConfig;
use quicknotes::db::Database;
use quicknotes::store::NoteStore;
use quicknotes::table::RemoteTable;

#[derive(Parser)]
#[command(name = "quicknotes")]
#[command(about = "Notes kept in a shared table, with keyword summaries")]
struct Cli {
    /// Use the local SQLite database instead of the note table service
    #[arg(long, global = true)]
    local: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the note table service
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
    #[command(flatten)]
    Notes(NoteCommand),
}

/// Initialize tracing with output to stderr (client commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "quicknotes=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Client commands print their result on stdout
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let serving = matches!(args.command, Commands::Serve { .. });
    init_tracing(!serving);

    let config = AppConfig::load();

    match args.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            tracing::info!("Starting quicknotes table service on port {}", port);

            let db = Database::open(config.database_path()?)?;
            db.migrate()?;

            let app = api::create_router(db);

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!(
                "quicknotes table service listening on http://127.0.0.1:{}",
                port
            );

            axum::serve(listener, app).await?;
        }
        Commands::Notes(command) => {
            let output = if args.local {
                let db = Database::open(config.database_path()?)?;
                db.migrate()?;
                cli::run(&NoteStore::new(db), &config.summary, command).await?
            } else {
                let table = RemoteTable::from_config(&config);
                cli::run(&NoteStore::new(table), &config.summary, command).await?
            };
            print!("{}", output);
        }
    }

    Ok(())
}
