use std::io;

use thiserror::Error;

use super::entities::{Commodity, InputKind, Unit};

/// Failures reported by the conversion and valuation operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MetricsError {
    #[error("commodity {0} is not supported")]
    UnknownCommodity(String),
    #[error("unit {unit} is not supported{}", .commodity.map(|c| format!(" for {c}")).unwrap_or_default())]
    UnsupportedUnit {
        unit: String,
        commodity: Option<Commodity>,
    },
    #[error("no price available for {0}")]
    PriceUnavailable(Commodity),
    #[error("input {0} not found")]
    UnknownInput(String),
    #[error("area must be a positive number of hectares, got {0}")]
    InvalidArea(f64),
    #[error("revenue for {0} is zero; margin is undefined")]
    ZeroRevenue(Commodity),
    #[error("no productivity benchmark for {0}")]
    BenchmarkUnavailable(Commodity),
}

impl MetricsError {
    pub(crate) fn unsupported_unit(unit: Unit, commodity: Commodity) -> Self {
        Self::UnsupportedUnit {
            unit: unit.to_string(),
            commodity: Some(commodity),
        }
    }

    pub(crate) fn unknown_commodity(commodity: Commodity) -> Self {
        Self::UnknownCommodity(commodity.to_string())
    }

    pub(crate) fn unknown_input(input: InputKind) -> Self {
        Self::UnknownInput(input.to_string())
    }
}

/// Failures while loading or validating reference tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("embedded asset {0} is missing")]
    MissingAsset(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to decode reference tables: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{commodity}: factor for {unit} must be positive and finite, got {factor}")]
    InvalidFactor {
        commodity: Commodity,
        unit: Unit,
        factor: f64,
    },
    #[error("{0}: kilogram factor must be exactly 1")]
    KilogramFactor(Commodity),
    #[error("{0}: sack factor is required")]
    MissingSackFactor(Commodity),
    #[error("{0}: benchmark must satisfy min <= avg <= max")]
    InvalidBenchmark(Commodity),
    #[error("{0}: price must be positive and finite")]
    InvalidPrice(Commodity),
    #[error("{commodity}: price must be quoted per sack, got per {unit}")]
    PriceUnit { commodity: Commodity, unit: Unit },
    #[error("{0}: input price must be non-negative and finite")]
    InvalidInputPrice(InputKind),
}
