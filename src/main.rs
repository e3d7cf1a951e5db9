//! CLI entry point for mdwiki

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdwiki")]
#[command(version)]
#[command(about = "A minimal personal wiki that stores pages as markdown files", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new wiki
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// List all pages
    List,

    /// Start the wiki server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdwiki=debug,tower_http=debug,info"
    } else {
        "mdwiki=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing wiki in {:?}", target_dir);
            mdwiki::commands::init::init_wiki(&target_dir)?;
            println!("Initialized wiki in {:?}", target_dir);
        }

        Commands::List => {
            let wiki = mdwiki::Wiki::new(&base_dir)?;
            mdwiki::commands::list::run(&wiki)?;
        }

        Commands::Server { port, ip } => {
            let wiki = mdwiki::Wiki::new(&base_dir)?;
            let port = port.unwrap_or(wiki.config.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            mdwiki::server::start(&wiki, &ip, port).await?;
        }

        Commands::Version => {
            println!("mdwiki version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
