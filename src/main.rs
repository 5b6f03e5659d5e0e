use std::{
    net::ToSocketAddrs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use catalog::CatalogLoader;
use clap::{Parser, Subcommand};
use dal::{InventoryStore, MemoryStore, PgStore};
use records::InventoryManager;
use settings::{HwInvConfig, LoggingConfig, DEFAULT_CONFIG_PATH};
use web::AppState;

#[derive(Parser, Debug)]
#[command(name = "hwinv", author, version, about = "Hardware component inventory server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Server {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Keep records in memory instead of PostgreSQL. Nothing survives a
        /// restart.
        #[arg(long)]
        memory: bool,
    },

    /// Apply pending database migrations and exit
    Migrate {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt::fmt()
        .pretty()
        .with_max_level(logging.max_level);

    if let Some(output_file) = &logging.log_file {
        let file = std::fs::File::create(output_file)
            .with_context(|| format!("couldn't open log file {output_file}"))?;
        let file = std::sync::Mutex::new(file);

        let subscriber = subscriber.with_writer(file).finish();
        tracing::subscriber::set_global_default(subscriber).context("couldn't set up tracing")?;
    } else {
        let subscriber = subscriber.finish();
        tracing::subscriber::set_global_default(subscriber).context("couldn't set up tracing")?;
    }

    tracing::info!("tracing has been started");
    tracing::debug!("debug tracing has been started");
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<HwInvConfig> {
    let config = settings::load(path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    init_tracing(&config.logging)?;
    Ok(config)
}

async fn run_server(config: HwInvConfig, memory: bool) -> anyhow::Result<()> {
    let store: Arc<dyn InventoryStore> = if memory {
        tracing::warn!("Using the in-memory store, records will not be persisted");
        Arc::new(MemoryStore::new())
    } else {
        tracing::warn!("Setting up the database connection pool");
        let pool = dal::get_db_pool(&config.database).await?;
        dal::migrate(&pool).await?;
        Arc::new(PgStore::new(pool))
    };

    let catalogs = CatalogLoader::new(&config.catalog.directory);
    tracing::info!("Reading catalogs from {}", catalogs.directory().display());

    let manager = InventoryManager::new(store, catalogs, config.inventory.clone());

    let bind = &config.web.bind_addr;
    let addr = (bind.host.as_str(), bind.port)
        .to_socket_addrs()
        .with_context(|| format!("resolving bind address {bind}"))?
        .next()
        .with_context(|| format!("bind address {bind} did not resolve"))?;

    web::serve(addr, AppState::new(manager)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Server { config, memory } => {
            println!("Starting in Server Mode");
            let config = load_config(&config)?;
            run_server(config, memory).await
        }
        Command::Migrate { config } => {
            let config = load_config(&config)?;
            let pool = dal::get_db_pool(&config.database).await?;
            dal::migrate(&pool).await?;
            tracing::info!("Migrations applied");
            Ok(())
        }
    }
}
