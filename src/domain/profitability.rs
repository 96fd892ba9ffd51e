use super::entities::{
    Commodity, InputCostResult, InputDefinition, InputKind, ProfitabilityResult, Unit,
};
use super::error::MetricsError;
use super::productivity::check_area;
use super::tables::ReferenceTables;
use crate::util::round2;

/// Cost of buying `quantity` of a farm input.
///
/// Only two unit adjustments exist: kilograms of a tonne-priced input are
/// scaled to tonnes, and litres of a litre-priced input pass through. Any
/// other quantity is taken to already be in the input's native unit.
pub fn calculate_input_cost(
    tables: &ReferenceTables,
    input: InputKind,
    quantity: f64,
    unit: Unit,
) -> Result<InputCostResult, MetricsError> {
    let definition = tables.input(input)?;
    let adjusted_quantity = adjust_quantity(definition, quantity, unit);

    Ok(InputCostResult {
        input,
        adjusted_quantity,
        unit_label: definition.unit_label(),
        price_per_unit: definition.price,
        total_cost: round2(adjusted_quantity * definition.price),
    })
}

fn adjust_quantity(definition: &InputDefinition, quantity: f64, unit: Unit) -> f64 {
    match (unit, definition.unit) {
        (Unit::Kilogram, Unit::Tonne) => quantity / 1000.0,
        (Unit::Litre, Unit::Litre) => quantity,
        _ => quantity,
    }
}

/// Revenue, cost and margin for a planted area at a given yield (sacks/ha).
pub fn calculate_profitability(
    tables: &ReferenceTables,
    area: f64,
    commodity: Commodity,
    productivity: f64,
    input_costs: &[InputCostResult],
) -> Result<ProfitabilityResult, MetricsError> {
    tables.commodity(commodity)?;
    check_area(area)?;
    let price = tables.price(commodity)?.value;

    let production = area * productivity;
    let revenue = production * price;
    if revenue == 0.0 || !revenue.is_finite() {
        return Err(MetricsError::ZeroRevenue(commodity));
    }

    let total_input_cost: f64 = input_costs.iter().map(|cost| cost.total_cost).sum();
    let profit = revenue - total_input_cost;

    Ok(ProfitabilityResult {
        area,
        commodity,
        productivity,
        production,
        revenue: round2(revenue),
        total_input_cost: round2(total_input_cost),
        profit: round2(profit),
        profit_margin_percent: round2(profit / revenue * 100.0),
        revenue_per_hectare: round2(revenue / area),
        profit_per_hectare: round2(profit / area),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> ReferenceTables {
        ReferenceTables::builtin().unwrap()
    }

    #[test]
    fn fertilizer_in_kilograms_is_priced_per_tonne() {
        let result =
            calculate_input_cost(&tables(), InputKind::FertilizerNpk, 500.0, Unit::Kilogram)
                .unwrap();
        assert_eq!(result.adjusted_quantity, 0.5);
        assert_eq!(result.unit_label, "tonne");
        assert_eq!(result.price_per_unit, 2800.0);
        assert_eq!(result.total_cost, 1400.0);
    }

    #[test]
    fn litres_pass_through_for_liquids() {
        let result =
            calculate_input_cost(&tables(), InputKind::DieselFuel, 250.0, Unit::Litre).unwrap();
        assert_eq!(result.adjusted_quantity, 250.0);
        assert_eq!(result.unit_label, "litre");
        assert_eq!(result.total_cost, 1450.0);
    }

    #[test]
    fn other_units_are_taken_as_native() {
        // tonnes for a tonne-priced input, and kilograms for a litre-priced
        // input, are both used unchanged
        let t = tables();
        let fertilizer =
            calculate_input_cost(&t, InputKind::FertilizerNpk, 2.0, Unit::Tonne).unwrap();
        assert_eq!(fertilizer.adjusted_quantity, 2.0);
        assert_eq!(fertilizer.total_cost, 5600.0);

        let herbicide =
            calculate_input_cost(&t, InputKind::Herbicide, 10.0, Unit::Kilogram).unwrap();
        assert_eq!(herbicide.adjusted_quantity, 10.0);
        assert_eq!(herbicide.total_cost, 850.0);
    }

    #[test]
    fn unknown_input_is_reported() {
        let mut t = tables();
        t.inputs.remove(&InputKind::Fungicide);
        let err = calculate_input_cost(&t, InputKind::Fungicide, 1.0, Unit::Litre).unwrap_err();
        assert_eq!(err, MetricsError::UnknownInput("fungicide".to_string()));
    }

    #[test]
    fn profitability_for_a_soybean_field() {
        let t = tables();
        let costs = vec![
            calculate_input_cost(&t, InputKind::FertilizerNpk, 30_000.0, Unit::Kilogram).unwrap(),
            calculate_input_cost(&t, InputKind::SoybeanSeed, 100.0, Unit::Sack).unwrap(),
        ];
        let result = calculate_profitability(&t, 100.0, Commodity::Soybean, 55.0, &costs).unwrap();

        assert_eq!(result.production, 5500.0);
        assert_eq!(result.revenue, 1_003_750.0);
        assert_eq!(result.total_input_cost, 102_000.0);
        assert_eq!(result.profit, 901_750.0);
        assert_eq!(result.profit_margin_percent, 89.84);
        assert_eq!(result.revenue_per_hectare, 10_037.5);
        assert_eq!(result.profit_per_hectare, 9_017.5);
    }

    #[test]
    fn losses_give_negative_margin() {
        let t = tables();
        let costs = vec![calculate_input_cost(&t, InputKind::CornSeed, 100.0, Unit::Sack).unwrap()];
        let result = calculate_profitability(&t, 1.0, Commodity::Corn, 100.0, &costs).unwrap();
        assert_eq!(result.revenue, 9530.0);
        assert_eq!(result.profit, -35_470.0);
        assert!(result.profit_margin_percent < 0.0);
    }

    #[test]
    fn zero_area_and_zero_revenue_are_guarded() {
        let t = tables();
        assert_eq!(
            calculate_profitability(&t, 0.0, Commodity::Wheat, 40.0, &[]).unwrap_err(),
            MetricsError::InvalidArea(0.0)
        );
        assert_eq!(
            calculate_profitability(&t, 10.0, Commodity::Wheat, 0.0, &[]).unwrap_err(),
            MetricsError::ZeroRevenue(Commodity::Wheat)
        );
    }

    #[test]
    fn profitability_needs_a_price() {
        let mut t = tables();
        t.prices.remove(&Commodity::Sugar);
        let err = calculate_profitability(&t, 10.0, Commodity::Sugar, 100.0, &[]).unwrap_err();
        assert_eq!(err, MetricsError::PriceUnavailable(Commodity::Sugar));
    }
}
