//! # Frontier Market Data
//!
//! The boundary between the analysis core and the outside world's price and
//! symbol information.
//!
//! ## Public API
//!
//! - `PriceSource`: the contract for fetching a `PriceSeries` per symbol and date range.
//!   `CsvPriceSource` reads local price files; `InMemoryPriceSource` serves tests.
//! - `SymbolDirectory`: display names for symbols, consumed only for reporting.
//! - `MarketDataError`: the specific error types that can be returned from this crate.

pub mod csv_source;
pub mod directory;
pub mod error;
pub mod source;

pub use csv_source::CsvPriceSource;
pub use directory::{CsvSymbolDirectory, StaticSymbolDirectory, SymbolDirectory};
pub use error::MarketDataError;
pub use source::{InMemoryPriceSource, PriceSource};
