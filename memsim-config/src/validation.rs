//! Custom validation functions for configuration.

use std::mem;

use validator::ValidationError;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Validate that a simulated base address is non-zero and word aligned.
pub fn validate_base_address(address: u64) -> Result<(), ValidationError> {
    let word = mem::size_of::<usize>() as u64;
    if address != 0 && address % word == 0 {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_base_address"))
    }
}

/// Validate a default log level.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate the log output layout.
pub fn validate_log_format(format: &str) -> Result<(), ValidationError> {
    match format.to_lowercase().as_str() {
        "pretty" | "compact" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_format")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_address_rules() {
        assert!(validate_base_address(0x10000).is_ok());
        assert!(validate_base_address(0).is_err());
        assert!(validate_base_address(0x10001).is_err());
    }

    #[test]
    fn log_level_rules() {
        assert!(validate_log_level("WARN").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }
}
