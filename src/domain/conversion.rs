use super::entities::{Commodity, ConversionResult, Unit};
use super::error::MetricsError;
use super::tables::ReferenceTables;
use crate::util::round2;

/// Converts `value` between two units of the same commodity by going through
/// kilograms.
pub fn convert(
    tables: &ReferenceTables,
    value: f64,
    from_unit: Unit,
    to_unit: Unit,
    commodity: Commodity,
) -> Result<ConversionResult, MetricsError> {
    let definition = tables.commodity(commodity)?;
    let from_factor = definition
        .factor(from_unit)
        .ok_or_else(|| MetricsError::unsupported_unit(from_unit, commodity))?;
    let to_factor = definition
        .factor(to_unit)
        .ok_or_else(|| MetricsError::unsupported_unit(to_unit, commodity))?;

    let kilograms = value * from_factor;
    let converted = if from_unit == to_unit {
        value
    } else {
        kilograms / to_factor
    };

    Ok(ConversionResult {
        value: round2(converted),
        from_unit,
        to_unit,
        commodity,
        input: value,
        kilograms,
    })
}
