//! Record merge engine.
//!
//! A merge pass applies source results in chain order. For each of title,
//! brand and image URL, the first result carrying a non-empty value fills the
//! field, provided the record does not already know it. Scan and model codes
//! belong to the extraction stages and are never merged.

use crate::models::{CollectibleRecord, IdentitySourceResult, RecordField};

/// One merge pass over a record.
pub struct MergePass<'a> {
    record: &'a mut CollectibleRecord,
    assigned: Vec<RecordField>,
}

impl<'a> MergePass<'a> {
    pub fn new(record: &'a mut CollectibleRecord) -> Self {
        Self {
            record,
            assigned: Vec::new(),
        }
    }

    pub fn record(&self) -> &CollectibleRecord {
        self.record
    }

    /// Fields assigned so far in this pass, in assignment order.
    pub fn assigned(&self) -> &[RecordField] {
        &self.assigned
    }

    /// Merge one result; returns the fields it filled.
    pub fn apply(&mut self, result: &IdentitySourceResult) -> Vec<RecordField> {
        if !result.found {
            return Vec::new();
        }

        let mut filled = Vec::new();
        for field in RecordField::MERGEABLE {
            let incoming = incoming_value(result, field).trim();
            if incoming.is_empty()
                || self.assigned.contains(&field)
                || !self.record.is_unknown(field)
            {
                continue;
            }
            self.record.set(field, incoming);
            self.assigned.push(field);
            filled.push(field);
        }
        filled
    }
}

fn incoming_value(result: &IdentitySourceResult, field: RecordField) -> &str {
    match field {
        RecordField::Title => &result.title,
        RecordField::Brand => &result.brand,
        RecordField::ImageUrl => &result.image_url,
        RecordField::ScanCode | RecordField::ModelCode => "",
    }
}

/// Run a complete pass over `results` in order.
pub fn merge_all(
    record: &mut CollectibleRecord,
    results: &[IdentitySourceResult],
) -> Vec<RecordField> {
    let mut pass = MergePass::new(record);
    for result in results {
        pass.apply(result);
    }
    pass.assigned().to_vec()
}
