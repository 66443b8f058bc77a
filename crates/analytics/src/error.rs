use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {available} aligned observations, at least {required} required")]
    InsufficientData { required: usize, available: usize },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Non-finite value in {what} at index {index}")]
    NonFinite { what: &'static str, index: usize },

    #[error("Invalid input: {0}")]
    Core(#[from] CoreError),
}
