//! The collectible record under identification.

use serde::{Deserialize, Serialize};

/// Category name a fresh record carries until a source supplies a real brand.
pub const DEFAULT_BRAND: &str = "Hot Wheels";

/// Names a field of [`CollectibleRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Title,
    Brand,
    ImageUrl,
    ScanCode,
    ModelCode,
}

impl RecordField {
    /// Fields identity sources are allowed to fill in.
    pub const MERGEABLE: [RecordField; 3] =
        [RecordField::Title, RecordField::Brand, RecordField::ImageUrl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Brand => "brand",
            Self::ImageUrl => "image_url",
            Self::ScanCode => "scan_code",
            Self::ModelCode => "model_code",
        }
    }
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identification state for one item.
///
/// A record starts empty (apart from the placeholder brand), is filled in by
/// the scan pipeline and by user edits, and is reset after it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectibleRecord {
    pub title: String,
    pub brand: String,
    pub image_url: String,
    pub scan_code: String,
    pub model_code: String,
    #[serde(skip, default = "default_brand")]
    default_brand: String,
}

fn default_brand() -> String {
    DEFAULT_BRAND.to_string()
}

impl Default for CollectibleRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectibleRecord {
    /// Create an empty record with the standard placeholder brand.
    pub fn new() -> Self {
        Self::with_default_brand(DEFAULT_BRAND)
    }

    /// Create an empty record whose placeholder brand is `brand`.
    pub fn with_default_brand(brand: &str) -> Self {
        Self {
            title: String::new(),
            brand: brand.to_string(),
            image_url: String::new(),
            scan_code: String::new(),
            model_code: String::new(),
            default_brand: brand.to_string(),
        }
    }

    /// The placeholder brand this record was created with.
    pub fn default_brand(&self) -> &str {
        &self.default_brand
    }

    pub fn get(&self, field: RecordField) -> &str {
        match field {
            RecordField::Title => &self.title,
            RecordField::Brand => &self.brand,
            RecordField::ImageUrl => &self.image_url,
            RecordField::ScanCode => &self.scan_code,
            RecordField::ModelCode => &self.model_code,
        }
    }

    /// Overwrite a field unconditionally. This is the user-edit path; the
    /// merge engine never calls it for populated fields.
    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RecordField::Title => self.title = value,
            RecordField::Brand => self.brand = value,
            RecordField::ImageUrl => self.image_url = value,
            RecordField::ScanCode => self.scan_code = value,
            RecordField::ModelCode => self.model_code = value,
        }
    }

    /// Whether a field still holds no real information.
    ///
    /// Whitespace-only values are unknown. A brand equal to the placeholder
    /// counts as unknown.
    pub fn is_unknown(&self, field: RecordField) -> bool {
        let value = self.get(field).trim();
        match field {
            RecordField::Brand => value.is_empty() || value == self.default_brand,
            _ => value.is_empty(),
        }
    }

    /// Whether the record may be handed to a catalog writer.
    pub fn is_persistable(&self) -> bool {
        !self.is_unknown(RecordField::Title)
    }

    /// Whether nothing has been learned about the item yet.
    pub fn is_blank(&self) -> bool {
        self.title.is_empty()
            && self.image_url.is_empty()
            && self.scan_code.is_empty()
            && self.model_code.is_empty()
            && self.is_unknown(RecordField::Brand)
    }

    /// Return every field to its initial value.
    pub fn reset(&mut self) {
        *self = Self::with_default_brand(&self.default_brand);
    }
}
