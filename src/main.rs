use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::Settings;
use web_server::AppState;

/// The main entry point for the project budget service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = configuration::load_settings().context("Failed to load settings")?;
    configuration::init_tracing(&settings.log)?;

    // Execute the appropriate command
    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            args.apply(&mut settings);
            handle_serve(settings).await
        }
        Commands::Migrate => handle_migrate(settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small HTTP service for project budgets with on-the-fly currency conversion.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Defaults to `serve` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Apply schema migrations to the configured database and exit.
    Migrate,
}

#[derive(Parser, Default)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

impl ServeArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(host) = self.host {
            settings.server.host = host;
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(settings: Settings) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;
    let state = AppState::from_settings(&settings)
        .await
        .context("Failed to initialise the application state")?;

    web_server::run_server(addr, state).await
}

async fn handle_migrate(settings: Settings) -> anyhow::Result<()> {
    // `connect` applies the backend's migrations before returning.
    let store = database::connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    let rows = store.count().await?;

    tracing::info!(backend = ?settings.database.backend, rows, "Migrations applied.");
    Ok(())
}
