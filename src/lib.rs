//! Unit conversion and valuation for agricultural commodities.
//!
//! [`AgriMetrics`] owns a set of reference tables (commodity unit factors,
//! prices per sack, yield benchmarks and farm input prices) and answers
//! conversion, valuation, barter, productivity, input cost and profitability
//! questions over them.

pub mod domain;
pub mod engine;
pub mod infra;
pub mod logging;
pub mod util;

pub use domain::{
    BarterResult, Commodity, ConversionResult, InputCostResult, InputKind, MetricsError,
    PerformanceTier, PriceEntry, ProductivityBenchmark, ProductivityResult, ProfitabilityResult,
    ReferenceTables, TableError, Unit, ValuationResult,
};
pub use engine::AgriMetrics;
pub use infra::{MarketDataProvider, MarketQuote};
