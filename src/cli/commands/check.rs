//! Check command: report backend availability and resolved settings.

use console::style;

use super::{build_barcode, build_ocr, build_resolver};
use collectscan::barcode::BarcodeBackend;
use crate::cli::icons::{dim_arrow, error, success};
use collectscan::config::Settings;
use collectscan::ocr::OcrBackend;

fn report(name: &str, available: bool, hint: String) -> bool {
    if available {
        println!("  {} {}", success(), name);
    } else {
        println!("  {} {} {}", error(), name, style(hint).dim());
    }
    available
}

pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    println!("{}", style("Backends").bold());
    let barcode = build_barcode();
    let ocr = build_ocr(settings);
    let barcode_ok = report(barcode.name(), barcode.is_available(), barcode.availability_hint());
    let ocr_ok = report(
        ocr.backend_type().as_str(),
        ocr.is_available(),
        ocr.availability_hint(),
    );

    println!();
    println!("{}", style("Identity sources").bold());
    for name in build_resolver(settings)?.source_names() {
        println!("  {} {}", dim_arrow(), name);
    }

    println!();
    println!("{}", style("Settings").bold());
    match settings.sheets {
        Some(ref sheets) => {
            println!(
                "  {} catalog: Google Sheet {} ({})",
                dim_arrow(),
                sheets.spreadsheet_id,
                sheets.range
            );
            if sheets.access_token.is_none() {
                println!(
                    "  {} no access token; set {}",
                    error(),
                    collectscan::config::SHEETS_TOKEN_ENV
                );
            }
        }
        None => println!(
            "  {} catalog: {}",
            dim_arrow(),
            settings.catalog_path.display()
        ),
    }
    println!("  {} default brand: {}", dim_arrow(), settings.default_brand);
    println!("  {} OCR language: {}", dim_arrow(), settings.ocr_language);
    println!("  {} timeout: {}s", dim_arrow(), settings.request_timeout);
    println!(
        "  {} lookup encoding: {}",
        dim_arrow(),
        settings.sources.lookup_encoding.as_str()
    );

    if !(barcode_ok && ocr_ok) {
        println!();
        println!(
            "{}",
            style("Scans still run without missing tools, with fewer signals.").dim()
        );
    }
    Ok(())
}
