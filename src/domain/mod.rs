//! Commodity conversion and valuation logic lives here.

pub mod conversion;
pub mod entities;
pub mod error;
pub mod evaluation;
pub mod productivity;
pub mod profitability;
pub mod tables;

pub use conversion::convert;
pub use entities::{
    BarterGive, BarterReceive, BarterResult, Commodity, CommodityDefinition, ConversionResult,
    InputCostResult, InputDefinition, InputKind, PerformanceTier, PriceEntry,
    ProductivityBenchmark, ProductivityResult, ProfitabilityResult, Unit, ValuationResult,
};
pub use error::{MetricsError, TableError};
pub use evaluation::{calculate_barter, calculate_value, export_parity_price, BoardQuote};
pub use productivity::calculate_productivity;
pub use profitability::{calculate_input_cost, calculate_profitability};
pub use tables::{PriceTable, ReferenceTables};
