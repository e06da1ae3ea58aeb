use crate::error::{BumpError, Result};

/// Parse a build counter and return the next value.
pub fn increment_version_code(code: &str) -> Result<u64> {
    let current = code
        .parse::<u64>()
        .map_err(|_| BumpError::MalformedVersionCode(format!("'{}' is not a number", code)))?;

    current
        .checked_add(1)
        .ok_or_else(|| BumpError::MalformedVersionCode(format!("'{}' cannot be incremented", code)))
}
