//! Reference tables owned by one engine instance.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use super::entities::{
    Commodity, CommodityDefinition, InputDefinition, InputKind, PriceEntry,
    ProductivityBenchmark, Unit,
};
use super::error::{MetricsError, TableError};
use crate::util::assets;

pub type PriceTable = BTreeMap<Commodity, PriceEntry>;

/// Commodity definitions, prices, yield benchmarks and farm input prices.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub commodities: BTreeMap<Commodity, CommodityDefinition>,
    #[serde(default)]
    pub prices: PriceTable,
    #[serde(default)]
    pub benchmarks: BTreeMap<Commodity, ProductivityBenchmark>,
    #[serde(default)]
    pub inputs: BTreeMap<InputKind, InputDefinition>,
}

impl ReferenceTables {
    /// The tables shipped with the crate.
    pub fn builtin() -> Result<Self, TableError> {
        let bytes = assets::reference_tables_json()?;
        Self::from_json(&bytes)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, TableError> {
        let tables: Self = serde_json::from_slice(bytes)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let bytes = fs::read(path)?;
        Self::from_json(&bytes)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        for (&commodity, definition) in &self.commodities {
            for (&unit, &factor) in &definition.factors {
                if !factor.is_finite() || factor <= 0.0 {
                    return Err(TableError::InvalidFactor {
                        commodity,
                        unit,
                        factor,
                    });
                }
            }
            if definition.factor(Unit::Kilogram) != Some(1.0) {
                return Err(TableError::KilogramFactor(commodity));
            }
            if definition.factor(Unit::Sack).is_none() {
                return Err(TableError::MissingSackFactor(commodity));
            }
        }

        for (&commodity, entry) in &self.prices {
            if !is_valid_price(entry.value) {
                return Err(TableError::InvalidPrice(commodity));
            }
            if entry.unit != Unit::Sack {
                return Err(TableError::PriceUnit {
                    commodity,
                    unit: entry.unit,
                });
            }
        }

        for (&commodity, benchmark) in &self.benchmarks {
            let ordered = benchmark.min <= benchmark.avg && benchmark.avg <= benchmark.max;
            let finite = [benchmark.min, benchmark.avg, benchmark.max]
                .iter()
                .all(|v| v.is_finite());
            if !ordered || !finite {
                return Err(TableError::InvalidBenchmark(commodity));
            }
        }

        for (&input, definition) in &self.inputs {
            if !definition.price.is_finite() || definition.price < 0.0 {
                return Err(TableError::InvalidInputPrice(input));
            }
        }

        Ok(())
    }

    pub fn commodity(&self, commodity: Commodity) -> Result<&CommodityDefinition, MetricsError> {
        self.commodities
            .get(&commodity)
            .ok_or_else(|| MetricsError::unknown_commodity(commodity))
    }

    pub fn factor(&self, commodity: Commodity, unit: Unit) -> Result<f64, MetricsError> {
        self.commodity(commodity)?
            .factor(unit)
            .ok_or_else(|| MetricsError::unsupported_unit(unit, commodity))
    }

    pub fn price(&self, commodity: Commodity) -> Result<&PriceEntry, MetricsError> {
        self.prices
            .get(&commodity)
            .ok_or(MetricsError::PriceUnavailable(commodity))
    }

    pub fn benchmark(&self, commodity: Commodity) -> Result<&ProductivityBenchmark, MetricsError> {
        self.benchmarks
            .get(&commodity)
            .ok_or(MetricsError::BenchmarkUnavailable(commodity))
    }

    pub fn input(&self, input: InputKind) -> Result<&InputDefinition, MetricsError> {
        self.inputs
            .get(&input)
            .ok_or_else(|| MetricsError::unknown_input(input))
    }

    pub fn available_commodities(&self) -> Vec<Commodity> {
        self.commodities.keys().copied().collect()
    }

    pub fn available_units(&self, commodity: Commodity) -> Result<Vec<Unit>, MetricsError> {
        Ok(self.commodity(commodity)?.units())
    }

    pub fn available_inputs(&self) -> Vec<InputKind> {
        self.inputs.keys().copied().collect()
    }
}

pub(crate) fn is_valid_price(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_every_identifier() {
        let tables = ReferenceTables::builtin().unwrap();
        assert_eq!(tables.available_commodities(), Commodity::ALL.to_vec());
        assert_eq!(tables.available_inputs(), InputKind::ALL.to_vec());
        for commodity in Commodity::ALL {
            assert!(tables.price(commodity).is_ok());
            assert!(tables.benchmark(commodity).is_ok());
        }
    }

    #[test]
    fn sugar_sack_is_fifty_kilograms() {
        let tables = ReferenceTables::builtin().unwrap();
        assert_eq!(tables.factor(Commodity::Sugar, Unit::Sack).unwrap(), 50.0);
        assert_eq!(tables.factor(Commodity::Soybean, Unit::Sack).unwrap(), 60.0);
    }

    #[test]
    fn coffee_has_no_bushel() {
        let tables = ReferenceTables::builtin().unwrap();
        let units = tables.available_units(Commodity::Coffee).unwrap();
        assert!(!units.contains(&Unit::Bushel));
        assert_eq!(
            tables.factor(Commodity::Coffee, Unit::Bushel),
            Err(MetricsError::unsupported_unit(Unit::Bushel, Commodity::Coffee))
        );
    }

    #[test]
    fn rejects_kilogram_factor_other_than_one() {
        let json = br#"{ "commodities": { "corn": { "sack": 60.0, "kilogram": 2.0 } } }"#;
        let err = ReferenceTables::from_json(json).unwrap_err();
        assert!(matches!(err, TableError::KilogramFactor(Commodity::Corn)));
    }

    #[test]
    fn rejects_non_positive_factor() {
        let json = br#"{ "commodities": { "corn": { "sack": 0.0, "kilogram": 1.0 } } }"#;
        let err = ReferenceTables::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidFactor {
                commodity: Commodity::Corn,
                unit: Unit::Sack,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unordered_benchmark() {
        let json = br#"{
            "commodities": { "wheat": { "sack": 60.0, "kilogram": 1.0 } },
            "benchmarks": { "wheat": { "min": 50.0, "avg": 45.0, "max": 60.0 } }
        }"#;
        let err = ReferenceTables::from_json(json).unwrap_err();
        assert!(matches!(err, TableError::InvalidBenchmark(Commodity::Wheat)));
    }

    #[test]
    fn requires_sack_factor() {
        let json = br#"{ "commodities": { "corn": { "tonne": 1000.0, "kilogram": 1.0 } } }"#;
        let err = ReferenceTables::from_json(json).unwrap_err();
        assert!(matches!(err, TableError::MissingSackFactor(Commodity::Corn)));
    }

    #[test]
    fn rejects_price_not_quoted_per_sack() {
        let json = br#"{
            "commodities": { "corn": { "sack": 60.0, "tonne": 1000.0, "kilogram": 1.0 } },
            "prices": { "corn": { "value": 1500.0, "unit": "tonne" } }
        }"#;
        let err = ReferenceTables::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            TableError::PriceUnit {
                commodity: Commodity::Corn,
                unit: Unit::Tonne,
            }
        ));

        let per_sack = br#"{
            "commodities": { "corn": { "sack": 60.0, "tonne": 1000.0, "kilogram": 1.0 } },
            "prices": { "corn": { "value": 90.0 } }
        }"#;
        let tables = ReferenceTables::from_json(per_sack).unwrap();
        assert_eq!(tables.price(Commodity::Corn).unwrap().unit, Unit::Sack);
    }

    #[test]
    fn rejects_unknown_identifiers_in_documents() {
        let json = br#"{ "commodities": { "rice": { "kilogram": 1.0 } } }"#;
        assert!(matches!(
            ReferenceTables::from_json(json),
            Err(TableError::Decode(_))
        ));
    }
}
