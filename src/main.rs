use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use postpages::build::build_site;
use postpages::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "postpages")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The project directory (or any directory beneath it)
    #[arg(default_value = ".")]
    project: PathBuf,

    /// How to print the page requests
    #[arg(long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_directory(&cli.project)?;
    let pages = build_site(&config).context("Building pages")?;

    let stdout = std::io::stdout();
    match cli.format {
        Format::Yaml => serde_yaml::to_writer(stdout.lock(), &pages)?,
        Format::Json => {
            serde_json::to_writer_pretty(stdout.lock(), &pages)?;
            println!();
        }
    }
    Ok(())
}
