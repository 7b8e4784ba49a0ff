//! Shared field validators applied by request constructors.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::ValidationError;

pub(crate) const LABEL_MIN: usize = 1;
pub(crate) const LABEL_MAX: usize = 255;
pub(crate) const METADATA_MAX_ENTRIES: usize = 256;
pub(crate) const IP_ADDRESSES_MAX_ENTRIES: usize = 64;
pub(crate) const CHECK_TYPE_MIN: usize = 1;
pub(crate) const CHECK_TYPE_MAX: usize = 25;
pub(crate) const PERIOD_MIN: i64 = 30;
pub(crate) const PERIOD_MAX: i64 = 1800;
pub(crate) const TIMEOUT_MIN: i64 = 2;
pub(crate) const TIMEOUT_MAX: i64 = 1800;
pub(crate) const CRITERIA_MIN: usize = 1;
pub(crate) const CRITERIA_MAX: usize = 16384;
pub(crate) const DETAILS_MAX_ENTRIES: usize = 256;
pub(crate) const TARGET_ALIAS_MIN: usize = 1;
pub(crate) const TARGET_ALIAS_MAX: usize = 64;
pub(crate) const TARGET_HOSTNAME_MIN: usize = 1;
pub(crate) const TARGET_HOSTNAME_MAX: usize = 256;
pub(crate) const TARGET_RESOLVER_MIN: usize = 1;
pub(crate) const TARGET_RESOLVER_MAX: usize = 64;

static AGENT_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^[-.\w]{1,255}$")
        .size_limit(64 * 1024 * 1024)
        .build()
        .expect("agent id pattern is valid")
});

/// Character-length gate for string fields.
pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::InvalidSize {
            field,
            actual,
            min,
            max,
        });
    }
    Ok(())
}

/// Entry-count gate for map fields.
pub(crate) fn check_entries(
    field: &'static str,
    actual: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if actual > max {
        return Err(ValidationError::InvalidSize {
            field,
            actual,
            min: 0,
            max,
        });
    }
    Ok(())
}

/// Numeric-range gate.
pub(crate) fn check_range(
    field: &'static str,
    actual: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if actual < min || actual > max {
        return Err(ValidationError::InvalidRange {
            field,
            actual,
            min,
            max,
        });
    }
    Ok(())
}

/// Agent identifiers must match `^[-.\w]{1,255}$`.
pub(crate) fn check_agent_id(agent_id: &str) -> Result<(), ValidationError> {
    if !AGENT_ID_PATTERN.is_match(agent_id) {
        return Err(ValidationError::InvalidAgentId(agent_id.to_string()));
    }
    Ok(())
}
