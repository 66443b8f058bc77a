use analytics::AnalyticsError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizerError {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Weight draw summed to zero on {attempts} consecutive attempts")]
    DegenerateWeightDraw { attempts: u32 },

    #[error("Invalid sampler parameters: {0}")]
    InvalidParameters(String),

    #[error("Statistics error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Invalid input: {0}")]
    Core(#[from] CoreError),
}
