//! CLI parser and dispatch.

mod check;
mod lookup;
mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use collectscan::barcode::ZbarBackend;
use collectscan::catalog::{CatalogWriter, CsvCatalog, SheetsCatalog};
use collectscan::config::{load_settings, LoadOptions, Settings};
use collectscan::http_client::HttpClient;
use collectscan::identity::sources::default_resolver;
use collectscan::identity::IdentityResolver;
use collectscan::ocr::{OcrConfig, TesseractBackend};

#[derive(Parser)]
#[command(name = "collectscan")]
#[command(about = "Identify collectibles from packaging photos and catalog them")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// CSV catalog path (overrides config and environment)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a packaging photo and identify the item
    Scan {
        /// Image file to scan
        image: PathBuf,
        /// Set the item name before saving
        #[arg(long)]
        title: Option<String>,
        /// Set the brand/series before saving
        #[arg(long)]
        brand: Option<String>,
        /// Correct the model code
        #[arg(long)]
        model_code: Option<String>,
        /// Append the result to the catalog
        #[arg(short, long)]
        save: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Skip identity lookups
        #[arg(long)]
        no_lookup: bool,
    },

    /// Resolve an item from codes without an image
    Lookup {
        /// Numeric scan code (UPC/EAN)
        #[arg(long)]
        scan_code: Option<String>,
        /// Model code, e.g. JBB49-N7C5
        #[arg(long)]
        model_code: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check external tools and show resolved settings
    Check,
}

/// Identity chain built from settings.
pub(crate) fn build_resolver(settings: &Settings) -> anyhow::Result<IdentityResolver> {
    Ok(default_resolver(
        &settings.sources,
        settings.timeout(),
        &settings.user_agent,
    )?)
}

pub(crate) fn build_ocr(settings: &Settings) -> TesseractBackend {
    TesseractBackend::with_config(OcrConfig {
        language: settings.ocr_language.clone(),
        ..OcrConfig::default()
    })
}

pub(crate) fn build_barcode() -> ZbarBackend {
    ZbarBackend::new()
}

/// Sheets when configured, otherwise the CSV file.
pub(crate) fn build_catalog(settings: &Settings) -> anyhow::Result<Box<dyn CatalogWriter>> {
    match settings.sheets {
        Some(ref sheets) => {
            let client = HttpClient::builder("sheets", settings.timeout())
                .user_agent(&settings.user_agent)
                .build()
                .map_err(|e| anyhow::anyhow!(e))?;
            Ok(Box::new(SheetsCatalog::new(client, sheets)))
        }
        None => Ok(Box::new(CsvCatalog::new(&settings.catalog_path))),
    }
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        catalog: cli.catalog,
    };
    let settings = load_settings(&options).await?;

    match cli.command {
        Commands::Scan {
            image,
            title,
            brand,
            model_code,
            save,
            json,
            no_lookup,
        } => {
            let edits = scan::Edits {
                title,
                brand,
                model_code,
            };
            scan::cmd_scan(&settings, &image, edits, save, json, no_lookup).await
        }
        Commands::Lookup {
            scan_code,
            model_code,
            json,
        } => lookup::cmd_lookup(&settings, scan_code, model_code, json).await,
        Commands::Check => check::cmd_check(&settings).await,
    }
}
