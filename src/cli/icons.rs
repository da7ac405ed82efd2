//! Console output icons.

use console::{style, StyledObject};

/// Green checkmark.
pub fn success() -> StyledObject<&'static str> {
    style("✓").green()
}

/// Yellow bang.
pub fn warn() -> StyledObject<&'static str> {
    style("!").yellow()
}

/// Red cross.
pub fn error() -> StyledObject<&'static str> {
    style("✗").red()
}

/// Dim arrow for secondary info.
pub fn dim_arrow() -> StyledObject<&'static str> {
    style("→").dim()
}
