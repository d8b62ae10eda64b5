//! Gene Summon API Server

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gene_summon_core::{BuiltinCatalogLoader, FileCatalogLoader, SummonEngine};
use gene_summon_server::{AppState, router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser)]
#[command(name = "gene-summon-server")]
#[command(about = "HTTP API for Gene Summon races and card summons")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "5000")]
        port: u16,

        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,

        /// Catalog JSON file (defaults to the built-in catalog)
        #[arg(short, long, env = "GENE_SUMMON_CATALOG")]
        catalog: Option<PathBuf>,
    },
    /// Validate a catalog file and print its summary
    CheckCatalog {
        /// Catalog JSON file
        path: PathBuf,
    },
}

fn load_engine(catalog: Option<&PathBuf>) -> anyhow::Result<SummonEngine> {
    match catalog {
        Some(path) => SummonEngine::from_loader(&FileCatalogLoader::new(path))
            .with_context(|| format!("loading catalog {}", path.display())),
        None => SummonEngine::from_loader(&BuiltinCatalogLoader).context("loading built-in catalog"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gene_summon_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Serve {
            port,
            bind,
            catalog,
        } => {
            let engine = load_engine(catalog.as_ref())?;
            tracing::info!(
                "Catalog v{} ready: {} cards, fingerprint {:016x}",
                engine.catalog().version(),
                engine.catalog().total_items(),
                engine.catalog().fingerprint()
            );

            let app = router(AppState::new(engine));

            let bind_addr = format!("{bind}:{port}");
            tracing::info!("🧬 Gene Summon API running on http://{bind_addr}");

            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("binding {bind_addr}"))?;
            axum::serve(listener, app).await?;
        }
        Command::CheckCatalog { path } => {
            let engine = load_engine(Some(&path))?;
            let catalog = engine.catalog();
            println!("Catalog v{} OK ({})", catalog.version(), path.display());
            for tier in gene_summon_core::RarityTier::ALL {
                let pool = catalog.pool(tier);
                let total: u64 = pool.iter().map(|item| u64::from(item.weight)).sum();
                println!(
                    "  {} {:<7} {} cards, pool weight {total}, tier weight {}",
                    tier.icon(),
                    tier.name(),
                    pool.len(),
                    catalog.tier_weight(tier)
                );
            }
            println!("  fingerprint {:016x}", catalog.fingerprint());
        }
    }

    Ok(())
}
