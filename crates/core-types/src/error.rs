use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Asset ordering mismatch: expected {expected:?}, found {found:?}")]
    AssetMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
