//! Reversible query encodings for lookup URLs.
//!
//! Some providers take the search term in an encoded form. These encodings
//! only change the representation; anyone can decode them, so they provide
//! no confidentiality.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// How a search term is encoded into a lookup URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryEncoding {
    /// Percent-encoding of reserved characters.
    #[default]
    Percent,
    /// URL-safe base64 without padding.
    Base64,
}

impl QueryEncoding {
    pub fn encode(&self, term: &str) -> String {
        match self {
            Self::Percent => urlencoding::encode(term).into_owned(),
            Self::Base64 => URL_SAFE_NO_PAD.encode(term.as_bytes()),
        }
    }

    /// Reverse [`encode`](Self::encode). Returns `None` for malformed input.
    pub fn decode(&self, encoded: &str) -> Option<String> {
        match self {
            Self::Percent => urlencoding::decode(encoded).ok().map(|s| s.into_owned()),
            Self::Base64 => URL_SAFE_NO_PAD
                .decode(encoded.as_bytes())
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Base64 => "base64",
        }
    }
}

/// Build a lookup URL by appending the encoded term to `base`.
pub fn lookup_url(base: &str, encoding: QueryEncoding, term: &str) -> String {
    format!("{}{}", base, encoding.encode(term))
}
