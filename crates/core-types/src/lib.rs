pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::CumulativePolicy;
pub use error::CoreError;
pub use structs::{
    AssetUniverse, CumulativeReturnPath, DrawdownPath, PortfolioSample, PriceSeries, PriceTable,
    ReturnTable, WeightVector, WEIGHT_SUM_TOLERANCE,
};
