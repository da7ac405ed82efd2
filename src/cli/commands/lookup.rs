//! Lookup command: run the identity chain on codes typed by the user.

use console::style;
use serde::Serialize;

use super::build_resolver;
use super::scan::{print_fields, print_resolution};
use collectscan::config::Settings;
use collectscan::identity::Resolution;
use collectscan::models::{CollectibleRecord, RecordField};

#[derive(Serialize)]
struct LookupOutput<'a> {
    record: &'a CollectibleRecord,
    resolution: &'a Resolution,
}

pub async fn cmd_lookup(
    settings: &Settings,
    scan_code: Option<String>,
    model_code: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    if scan_code.is_none() && model_code.is_none() {
        anyhow::bail!("Provide --scan-code and/or --model-code");
    }

    let mut record = CollectibleRecord::with_default_brand(&settings.default_brand);
    if let Some(code) = scan_code {
        record.set(RecordField::ScanCode, code.trim());
    }
    if let Some(code) = model_code {
        record.set(RecordField::ModelCode, code.trim().to_uppercase());
    }

    let resolver = build_resolver(settings)?;
    let resolution = resolver.resolve(&mut record).await;

    if json {
        let output = LookupOutput {
            record: &record,
            resolution: &resolution,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", style("Lookup").bold());
    print_resolution(&resolution);
    println!();
    print_fields(&record);
    Ok(())
}
