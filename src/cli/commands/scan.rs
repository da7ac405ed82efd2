//! Scan command.

use std::path::Path;

use console::style;
use serde::Serialize;

use super::{build_barcode, build_catalog, build_ocr, build_resolver};
use crate::cli::icons::{dim_arrow, error, success, warn};
use collectscan::config::Settings;
use collectscan::identity::{AttemptOutcome, IdentityResolver, Resolution};
use collectscan::models::{CollectibleRecord, RecordField};
use collectscan::pipeline::{ScanPipeline, ScanReport};
use collectscan::session::{PersistError, PersistOutcome, Session};

/// User edits applied after the pipeline runs.
#[derive(Debug, Default)]
pub struct Edits {
    pub title: Option<String>,
    pub brand: Option<String>,
    pub model_code: Option<String>,
}

impl Edits {
    fn apply(self, session: &mut Session) {
        if let Some(title) = self.title {
            session.edit(RecordField::Title, title);
        }
        if let Some(brand) = self.brand {
            session.edit(RecordField::Brand, brand);
        }
        if let Some(code) = self.model_code {
            session.edit(RecordField::ModelCode, code.to_uppercase());
        }
    }
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    record: &'a CollectibleRecord,
    report: &'a ScanReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved: Option<&'a PersistOutcome>,
}

/// Scan an image, apply edits and optionally save.
pub async fn cmd_scan(
    settings: &Settings,
    image: &Path,
    edits: Edits,
    save: bool,
    json: bool,
    no_lookup: bool,
) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", image.display(), e))?;

    let resolver = if no_lookup {
        IdentityResolver::new()
    } else {
        build_resolver(settings)?
    };
    let mut pipeline = ScanPipeline::new(
        Box::new(build_barcode()),
        Box::new(build_ocr(settings)),
        resolver,
    );
    if no_lookup {
        pipeline = pipeline.without_lookups();
    }

    let mut session = Session::with_default_brand(&settings.default_brand);
    let report = match session.scan(&pipeline, &bytes).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {}", error(), e);
            anyhow::bail!("scan of {} aborted", image.display());
        }
    };
    edits.apply(&mut session);

    let record = session.record().clone();
    let saved = if save {
        let catalog = build_catalog(settings)?;
        match session.persist(catalog.as_ref()).await {
            Ok(outcome) => Some(outcome),
            Err(PersistError::MissingTitle) => {
                print_record(&record, &report);
                eprintln!(
                    "{} Item name is required before saving (use --title)",
                    error()
                );
                anyhow::bail!("nothing saved");
            }
            Err(e) => {
                print_record(&record, &report);
                anyhow::bail!(e);
            }
        }
    } else {
        None
    };

    if json {
        let output = ScanOutput {
            record: &record,
            report: &report,
            saved: saved.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_record(&record, &report);
    if let Some(outcome) = saved {
        println!(
            "{} Saved to {} catalog",
            success(),
            style(&outcome.catalog).cyan()
        );
        if outcome.duplicate {
            println!(
                "  {} Scan code {} was already in the catalog",
                warn(),
                outcome.row.scan_code
            );
        }
    }

    Ok(())
}

fn print_record(record: &CollectibleRecord, report: &ScanReport) {
    println!(
        "{} {}x{}{}",
        style("Image").bold(),
        report.width,
        report.height,
        if report.scaled { " (scaled)" } else { "" }
    );
    match report.scan_code {
        Some(ref code) => println!("  {} barcode {}", dim_arrow(), code),
        None => println!("  {} no barcode found", dim_arrow()),
    }
    match report.model_code {
        Some(ref code) => println!("  {} model code {}", dim_arrow(), code),
        None => println!("  {} no model code found", dim_arrow()),
    }
    if let Some(ref resolution) = report.resolution {
        print_resolution(resolution);
    }
    println!();
    print_fields(record);
}

pub(super) fn print_resolution(resolution: &Resolution) {
    for attempt in &resolution.attempts {
        let outcome = match attempt.outcome {
            AttemptOutcome::Found => style("found").green(),
            AttemptOutcome::NotFound => style("no match").yellow(),
            AttemptOutcome::LinkGenerated => style("link").cyan(),
            AttemptOutcome::MissingInput => style("skipped").dim(),
            AttemptOutcome::TitleKnown => style("not needed").dim(),
        };
        println!("  {} {:<16} {}", dim_arrow(), attempt.source, outcome);
    }
    if let Some(ref url) = resolution.reference_url {
        println!("  {} reference {}", dim_arrow(), url);
    }
    if let Some(ref url) = resolution.manual_lookup_url {
        println!("  {} look it up: {}", warn(), style(url).underlined());
    }
}

pub(super) fn print_fields(record: &CollectibleRecord) {
    for field in [
        RecordField::Title,
        RecordField::Brand,
        RecordField::ImageUrl,
        RecordField::ScanCode,
        RecordField::ModelCode,
    ] {
        let value = record.get(field);
        let shown = if value.is_empty() {
            style("-").dim().to_string()
        } else {
            value.to_string()
        };
        println!("{:>12}: {}", style(field.as_str()).bold(), shown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_override_pipeline_values() {
        let mut session = Session::new();
        session.edit(RecordField::ModelCode, "JBB49-N7C5");
        Edits {
            title: Some("Bone Shaker".to_string()),
            brand: None,
            model_code: Some("jbb50-n7c5".to_string()),
        }
        .apply(&mut session);

        assert_eq!(session.record().title, "Bone Shaker");
        assert_eq!(session.record().brand, "Hot Wheels");
        assert_eq!(session.record().model_code, "JBB50-N7C5");
    }
}
