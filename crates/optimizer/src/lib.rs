//! # Frontier Optimizer
//!
//! Approximates the efficient frontier by Monte Carlo sampling: many random
//! long-only allocations are evaluated for annualized return and volatility,
//! and the one with the best Sharpe ratio is selected.
//!
//! ## Public API
//!
//! - `PortfolioSampler`: draws and evaluates random weight vectors, optionally in parallel.
//! - `FrontierSelector`: stable argmax over the Sharpe ratios of the samples.
//! - `OptimizerError`: The specific error types that can be returned from this crate.

pub mod error;
pub mod sampler;
pub mod selector;

pub use error::OptimizerError;
pub use sampler::{
    sharpe_ratio, PortfolioSampler, DEFAULT_MAX_DRAW_ATTEMPTS, DEFAULT_PERIODS_PER_YEAR,
};
pub use selector::FrontierSelector;
