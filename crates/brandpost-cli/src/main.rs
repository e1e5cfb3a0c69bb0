mod db;
mod review;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "brandpost")]
#[command(about = "brandpost command line interface")]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a candidate image against a folder of reference images
    Review {
        /// Directory holding the reference (previously published) images
        #[arg(long)]
        references: PathBuf,

        /// Image of the new post to review
        #[arg(long)]
        candidate: PathBuf,

        /// Exit non-zero when the verdict could not be produced
        #[arg(long)]
        strict: bool,
    },
    /// Extract the brand profile of a single image
    Extract {
        /// Image to analyse
        image: PathBuf,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Review {
            references,
            candidate,
            strict,
        }) => review::run_review(&references, &candidate, strict).await?,
        Some(Commands::Extract { image }) => review::run_extract(&image).await?,
        Some(Commands::Db { command }) => match command {
            DbCommands::Ping => db::run_ping().await?,
            DbCommands::Migrate => db::run_migrate().await?,
        },
        None => println!("brandpost: run `brandpost --help` for available commands"),
    }

    Ok(())
}
