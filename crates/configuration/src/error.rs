use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file or environment layers could not be merged into a `Config`.
    #[error("Failed to read layered configuration: {0}")]
    Layering(#[from] config::ConfigError),

    #[error("Invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_is_named_in_the_message() {
        let err = ConfigError::invalid("analysis.sample_count", "must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid `analysis.sample_count`: must be greater than 0"
        );
    }
}
