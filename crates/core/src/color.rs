//! Display color validation for catalog entries.

use crate::error::CoreError;

/// Default color for primary phases.
pub const DEFAULT_PHASE_COLOR: &str = "#6c757d";
/// Default color for fee phases.
pub const DEFAULT_FEE_PHASE_COLOR: &str = "#28a745";
/// Default color for task types.
pub const DEFAULT_TASK_TYPE_COLOR: &str = "#007bff";
/// Default color for claim types.
pub const DEFAULT_CLAIM_TYPE_COLOR: &str = "#007bff";

/// Validate that a color string is `#RRGGBB`.
pub fn validate_hex_color(color: &str) -> Result<(), CoreError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Must be in #RRGGBB hex format"
        )))
    }
}
