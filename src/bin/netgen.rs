//! netgen - Network configuration compiler CLI
//!
//! Compiles a definition document into NetworkManager keyfiles plus the
//! exclusion artifacts keeping NetworkManager away from devices other
//! backends own.

use clap::{Parser, Subcommand, ValueEnum};
use libnetgen::network_manager::NetworkManagerRenderer;
use libnetgen::{config, generate, NetgenError};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "netgen")]
#[command(about = "Network configuration compiler - render backend configs and exclusion rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: text, json
    #[arg(short = 'o', long, default_value = "text")]
    output: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a definition document and write all artifacts
    Generate {
        /// Definition document (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Write artifacts under this directory instead of the filesystem root
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
    /// Parse and validate a definition document without writing anything
    Check {
        /// Definition document (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("ERROR: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), NetgenError> {
    match &cli.command {
        Commands::Generate { config, root } => {
            let defs = config::load_document(config)?;
            let renderer = NetworkManagerRenderer::new();
            let summary = generate(&defs, &renderer, root.as_deref())?;

            match cli.output {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&summary)
                            .map_err(|e| NetgenError::Internal(e.to_string()))?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "Wrote {} connection file(s), {} exclusion file(s)",
                        summary.connection_files, summary.exclusion_files
                    );
                }
            }
            Ok(())
        }
        Commands::Check { config } => {
            let defs = config::load_document(config)?;
            match cli.output {
                OutputFormat::Json => {
                    let ids: Vec<&str> = defs.iter().map(|d| d.id.as_str()).collect();
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&ids)
                            .map_err(|e| NetgenError::Internal(e.to_string()))?
                    );
                }
                OutputFormat::Text => {
                    println!("OK: {} definition(s)", defs.len());
                }
            }
            Ok(())
        }
    }
}
