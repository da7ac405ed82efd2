//! Ordered identity source chain.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::merge::MergePass;
use super::{IdentitySource, SourceInput, SourceKind};
use crate::models::{CollectibleRecord, RecordField};
use crate::ocr::model_code_prefix;

/// What happened to one source during a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Queried and returned a match.
    Found,
    /// Queried without a match (or the query failed).
    NotFound,
    /// Produced a link for manual follow-up.
    LinkGenerated,
    /// Not queried: the record has no value for the source's input.
    MissingInput,
    /// Not queried: a title was already known.
    TitleKnown,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceAttempt {
    pub source: String,
    pub outcome: AttemptOutcome,
    pub assigned: Vec<RecordField>,
}

/// Summary of one resolution pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    pub attempts: Vec<SourceAttempt>,
    /// Fields filled during this pass, in order.
    pub assigned: Vec<RecordField>,
    /// Canonical page for the item, from the first source that offered one.
    pub reference_url: Option<String>,
    /// Search link for the user when no source produced a title.
    pub manual_lookup_url: Option<String>,
}

impl Resolution {
    pub fn outcome_for(&self, source: &str) -> Option<AttemptOutcome> {
        self.attempts
            .iter()
            .find(|a| a.source == source)
            .map(|a| a.outcome)
    }

    /// Whether any source was actually queried.
    pub fn queried_any(&self) -> bool {
        self.attempts.iter().any(|a| {
            matches!(
                a.outcome,
                AttemptOutcome::Found | AttemptOutcome::NotFound
            )
        })
    }
}

/// Queries identity sources in priority order.
#[derive(Clone, Default)]
pub struct IdentityResolver {
    sources: Vec<Arc<dyn IdentitySource>>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source to the end of the chain.
    pub fn push(&mut self, source: Arc<dyn IdentitySource>) {
        self.sources.push(source);
    }

    pub fn with_source(mut self, source: Arc<dyn IdentitySource>) -> Self {
        self.push(source);
        self
    }

    /// Source names in chain order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    fn key_for(input: SourceInput, record: &CollectibleRecord) -> Option<String> {
        match input {
            SourceInput::ScanCode => {
                let code = record.scan_code.trim();
                (!code.is_empty()).then(|| code.to_string())
            }
            SourceInput::ModelPrefix => model_code_prefix(&record.model_code).map(str::to_string),
        }
    }

    /// Enrich `record` from the chain.
    ///
    /// Automated sources run only while the title is unknown and their input
    /// is present; each runs at most once. Manual-link sources run only when
    /// no title was found by the end of the automated chain.
    pub async fn resolve(&self, record: &mut CollectibleRecord) -> Resolution {
        let mut resolution = Resolution::default();
        let mut pass = MergePass::new(record);

        for source in &self.sources {
            let name = source.name().to_string();
            let title_known = !pass.record().is_unknown(RecordField::Title);
            let key = Self::key_for(source.input(), pass.record());

            let outcome = match (source.kind(), key) {
                (_, _) if title_known => AttemptOutcome::TitleKnown,
                (_, None) => AttemptOutcome::MissingInput,
                (SourceKind::ManualLink, Some(key)) => {
                    let result = source.resolve(&key).await;
                    if result.reference_url.is_empty() {
                        AttemptOutcome::NotFound
                    } else {
                        debug!("{} generated manual lookup link", name);
                        resolution.manual_lookup_url = Some(result.reference_url);
                        AttemptOutcome::LinkGenerated
                    }
                }
                (SourceKind::Automated, Some(key)) => {
                    debug!("Querying {} for '{}'", name, key);
                    let result = source.resolve(&key).await;
                    let assigned = pass.apply(&result);

                    if result.found
                        && !result.reference_url.is_empty()
                        && resolution.reference_url.is_none()
                    {
                        resolution.reference_url = Some(result.reference_url.clone());
                    }

                    let outcome = if result.found {
                        info!("{} matched '{}': {}", name, key, result.title);
                        AttemptOutcome::Found
                    } else {
                        AttemptOutcome::NotFound
                    };
                    resolution.attempts.push(SourceAttempt {
                        source: name,
                        outcome,
                        assigned,
                    });
                    continue;
                }
            };

            resolution.attempts.push(SourceAttempt {
                source: name,
                outcome,
                assigned: Vec::new(),
            });
        }

        resolution.assigned = pass.assigned().to_vec();
        resolution
    }
}
