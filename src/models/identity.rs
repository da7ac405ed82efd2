//! Results returned by identity sources.

use serde::Serialize;

/// What a single identity source learned about an item.
///
/// Empty strings mean "not supplied". Values are consumed by the merge
/// engine and then dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentitySourceResult {
    pub found: bool,
    pub title: String,
    pub brand: String,
    pub image_url: String,
    pub reference_url: String,
}

impl IdentitySourceResult {
    /// A result carrying nothing.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// A successful match with the given display title.
    pub fn found(title: impl Into<String>) -> Self {
        Self {
            found: true,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    pub fn with_reference_url(mut self, url: impl Into<String>) -> Self {
        self.reference_url = url.into();
        self
    }
}
