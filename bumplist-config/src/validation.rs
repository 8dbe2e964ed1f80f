//! Custom validation functions for configuration.

use validator::ValidationError;

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Validate a comma-separated list of `level` or `target=level` directives.
pub fn validate_log_filter(filter: &str) -> Result<(), ValidationError> {
    if filter.trim().is_empty() {
        return Err(ValidationError::new("empty_log_filter"));
    }

    for directive in filter.split(',').map(str::trim) {
        let (target, level) = match directive.rsplit_once('=') {
            Some((target, level)) => (Some(target), level),
            None => (None, directive),
        };

        if let Some(target) = target {
            let valid_target = !target.is_empty()
                && target
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':' || c == '-');
            if !valid_target {
                return Err(ValidationError::new("invalid_log_target"));
            }
        }

        if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ValidationError::new("invalid_log_level"));
        }
    }
    Ok(())
}
