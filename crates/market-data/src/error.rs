use chrono::NaiveDate;
use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("No price data found for symbol '{symbol}' (looked in {location})")]
    SymbolNotFound { symbol: String, location: PathBuf },

    #[error("No price data for '{symbol}' between {start} and {end}")]
    NoData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Failed to read market data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV market data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid data format in {origin}: {reason}")]
    InvalidData { origin: String, reason: String },

    #[error("Invalid price series: {0}")]
    Core(#[from] CoreError),
}
