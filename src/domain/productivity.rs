use super::conversion::convert;
use super::entities::{
    Commodity, PerformanceTier, ProductivityBenchmark, ProductivityResult, Unit,
};
use super::error::MetricsError;
use super::tables::ReferenceTables;
use crate::util::round2;

impl PerformanceTier {
    /// Buckets a yield (sacks/ha) against a benchmark.
    ///
    /// Checked in order, first match wins: `>= max`, `>= avg`, `< min`,
    /// otherwise average.
    pub fn classify(productivity: f64, benchmark: &ProductivityBenchmark) -> Self {
        if productivity >= benchmark.max {
            Self::Excellent
        } else if productivity >= benchmark.avg {
            Self::Good
        } else if productivity < benchmark.min {
            Self::Low
        } else {
            Self::Average
        }
    }
}

pub(crate) fn check_area(area: f64) -> Result<(), MetricsError> {
    if area.is_finite() && area > 0.0 {
        Ok(())
    } else {
        Err(MetricsError::InvalidArea(area))
    }
}

/// Yield per hectare and how it compares to the commodity benchmark.
pub fn calculate_productivity(
    tables: &ReferenceTables,
    area: f64,
    production: f64,
    unit: Unit,
    commodity: Commodity,
) -> Result<ProductivityResult, MetricsError> {
    check_area(area)?;
    let in_sacks = convert(tables, production, unit, Unit::Sack, commodity)?;
    let benchmark = *tables.benchmark(commodity)?;

    let productivity = in_sacks.value / area;
    let tier = PerformanceTier::classify(productivity, &benchmark);

    Ok(ProductivityResult {
        area,
        production_in_sacks: in_sacks.value,
        productivity: round2(productivity),
        tier,
        benchmark,
        commodity,
    })
}
