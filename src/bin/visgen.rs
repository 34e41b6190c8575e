//! visgen CLI - compiles scene configuration documents into builder-API
//! initialization code.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use visgen::SymbolAllocator;

#[derive(Parser)]
#[command(name = "visgen")]
#[command(version, about = "Scene-configuration compiler emitting builder-API initialization code", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a configuration into the output skeleton
    Generate {
        /// Path to the scene configuration document
        config: PathBuf,

        /// Path to the output skeleton containing the @CONFIG_INIT_FUNC@ marker
        template: PathBuf,

        /// Destination path for the composed output
        output: PathBuf,

        /// Use a deterministic symbol counter instead of random identifiers
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Load and resolve a configuration without generating output
    Validate {
        /// Path to the scene configuration document
        config: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            config,
            template,
            output,
            seed,
        } => {
            let mut allocator = match seed {
                Some(start) => SymbolAllocator::seeded(start),
                None => SymbolAllocator::new(),
            };
            visgen::generate_file(&config, &template, &output, &mut allocator)
        }
        Commands::Validate { config } => visgen::validate_file(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
