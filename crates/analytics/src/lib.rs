//! # Frontier Analytics
//!
//! Pure calculations over price and return data: aligning price histories,
//! deriving returns, summarizing them as means and covariances, and turning a
//! fixed allocation into cumulative return and drawdown paths.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `ReturnStatistics` and `DrawdownEngine` hold no state. The
//!   same inputs always produce the same outputs.
//!
//! ## Public API
//!
//! - `align_prices` / `to_returns`: from raw `PriceSeries` to an aligned `ReturnTable`.
//! - `ReturnStatistics`: mean returns and the sample covariance matrix (`ReturnStats`).
//! - `cumulative_returns`: the cumulative path of a weighted portfolio.
//! - `DrawdownEngine`: the underwater curve of a cumulative path.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

pub mod cumulative;
pub mod drawdown;
pub mod error;
pub mod returns;
pub mod statistics;

pub use cumulative::{cumulative_returns, portfolio_returns};
pub use drawdown::DrawdownEngine;
pub use error::AnalyticsError;
pub use returns::{align_prices, returns_from_prices, to_returns};
pub use statistics::{ReturnStatistics, ReturnStats, MIN_OBSERVATIONS};
