use crate::error::MarketDataError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Supplies human-readable names for asset symbols. Used for reporting only.
pub trait SymbolDirectory: Send + Sync {
    /// The display name of `symbol`, if known.
    fn display_name(&self, symbol: &str) -> Option<String>;

    /// The display name, falling back to the symbol itself.
    fn display_name_or_symbol(&self, symbol: &str) -> String {
        self.display_name(symbol)
            .unwrap_or_else(|| symbol.to_string())
    }
}

/// A fixed symbol-to-name mapping. An empty directory knows no names.
#[derive(Debug, Clone, Default)]
pub struct StaticSymbolDirectory {
    names: HashMap<String, String>,
}

impl StaticSymbolDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(symbol.into(), name.into());
        self
    }
}

impl SymbolDirectory for StaticSymbolDirectory {
    fn display_name(&self, symbol: &str) -> Option<String> {
        self.names.get(symbol).cloned()
    }
}

#[derive(Debug, Deserialize)]
struct SymbolRecord {
    symbol: String,
    name: String,
}

/// A symbol directory loaded from a `symbol,name` CSV file.
#[derive(Debug, Clone, Default)]
pub struct CsvSymbolDirectory {
    inner: StaticSymbolDirectory,
}

impl CsvSymbolDirectory {
    pub fn load(path: &Path) -> Result<Self, MarketDataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut inner = StaticSymbolDirectory::new();
        for record in reader.deserialize() {
            let record: SymbolRecord = record?;
            inner = inner.with_name(record.symbol, record.name);
        }

        tracing::debug!(path = %path.display(), entries = inner.names.len(), "Loaded symbol directory.");
        Ok(Self { inner })
    }
}

impl SymbolDirectory for CsvSymbolDirectory {
    fn display_name(&self, symbol: &str) -> Option<String> {
        self.inner.display_name(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn csv_directory_resolves_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("symbols.csv");
        fs::write(
            &path,
            "symbol,name\nAAPL,Apple Inc.\nMSFT,\"Microsoft Corporation\"\n",
        )
        .unwrap();

        let directory = CsvSymbolDirectory::load(&path).unwrap();

        assert_eq!(directory.display_name("AAPL").as_deref(), Some("Apple Inc."));
        assert_eq!(
            directory.display_name_or_symbol("MSFT"),
            "Microsoft Corporation"
        );
        assert_eq!(directory.display_name_or_symbol("AMZN"), "AMZN");
    }

    #[test]
    fn missing_directory_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(CsvSymbolDirectory::load(&dir.path().join("absent.csv")).is_err());
    }
}
