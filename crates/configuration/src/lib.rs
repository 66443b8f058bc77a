use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod overrides;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use overrides::AnalysisOverrides;
pub use settings::{AnalysisConfig, Config, DataConfig, LoggingConfig};

/// Prefix of the environment variables that override file values,
/// e.g. `FRONTIER__ANALYSIS__SAMPLE_COUNT=5000`.
pub const ENV_PREFIX: &str = "FRONTIER";

/// Loads the application configuration.
///
/// Values are layered: built-in defaults, then the TOML file at `path` (if it
/// exists), then `FRONTIER__*` environment variables. The result is normalized
/// and validated before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("analysis.symbols")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let mut config = builder.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
