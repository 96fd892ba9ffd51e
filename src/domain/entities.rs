use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::MetricsError;

/// Agricultural commodities the engine knows how to weigh and price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Commodity {
    Soybean,
    Corn,
    Wheat,
    Coffee,
    Sugar,
}

impl Commodity {
    pub const ALL: [Commodity; 5] = [
        Commodity::Soybean,
        Commodity::Corn,
        Commodity::Wheat,
        Commodity::Coffee,
        Commodity::Sugar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soybean => "soybean",
            Self::Corn => "corn",
            Self::Wheat => "wheat",
            Self::Coffee => "coffee",
            Self::Sugar => "sugar",
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Commodity {
    type Err = MetricsError;

    /// Accepts the canonical names plus the Portuguese trade names
    /// (`soja`, `milho`, `trigo`, `cafe`, `acucar`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soybean" | "soybeans" | "soy" | "soja" => Ok(Self::Soybean),
            "corn" | "maize" | "milho" => Ok(Self::Corn),
            "wheat" | "trigo" => Ok(Self::Wheat),
            "coffee" | "cafe" | "café" => Ok(Self::Coffee),
            "sugar" | "acucar" | "açúcar" => Ok(Self::Sugar),
            _ => Err(MetricsError::UnknownCommodity(s.to_string())),
        }
    }
}

/// Units of measure. Mass units convert through kilograms; `Litre` only
/// shows up as the native unit of liquid farm inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Sack,
    Tonne,
    Bushel,
    Arroba,
    Kilogram,
    Litre,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sack => "sack",
            Self::Tonne => "tonne",
            Self::Bushel => "bushel",
            Self::Arroba => "arroba",
            Self::Kilogram => "kilogram",
            Self::Litre => "litre",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sack" | "sacks" | "sc" | "saca" | "sacas" => Ok(Self::Sack),
            "tonne" | "tonnes" | "ton" | "t" | "tonelada" | "toneladas" => Ok(Self::Tonne),
            "bushel" | "bushels" | "bu" => Ok(Self::Bushel),
            "arroba" | "arrobas" | "@" => Ok(Self::Arroba),
            "kilogram" | "kilograms" | "kg" | "quilo" | "quilos" => Ok(Self::Kilogram),
            "litre" | "litres" | "liter" | "liters" | "l" | "litro" | "litros" => Ok(Self::Litre),
            _ => Err(MetricsError::UnsupportedUnit {
                unit: s.to_string(),
                commodity: None,
            }),
        }
    }
}

/// Farm inputs with a catalogue price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    FertilizerNpk,
    SoybeanSeed,
    CornSeed,
    Herbicide,
    Fungicide,
    DieselFuel,
}

impl InputKind {
    pub const ALL: [InputKind; 6] = [
        InputKind::FertilizerNpk,
        InputKind::SoybeanSeed,
        InputKind::CornSeed,
        InputKind::Herbicide,
        InputKind::Fungicide,
        InputKind::DieselFuel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FertilizerNpk => "fertilizer_npk",
            Self::SoybeanSeed => "soybean_seed",
            Self::CornSeed => "corn_seed",
            Self::Herbicide => "herbicide",
            Self::Fungicide => "fungicide",
            Self::DieselFuel => "diesel_fuel",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fertilizer_npk" | "fertilizer" | "npk" | "fertilizante_npk" => Ok(Self::FertilizerNpk),
            "soybean_seed" | "semente_soja" => Ok(Self::SoybeanSeed),
            "corn_seed" | "semente_milho" => Ok(Self::CornSeed),
            "herbicide" | "defensivo_herbicida" => Ok(Self::Herbicide),
            "fungicide" | "defensivo_fungicida" => Ok(Self::Fungicide),
            "diesel_fuel" | "diesel" | "combustivel_diesel" => Ok(Self::DieselFuel),
            _ => Err(MetricsError::UnknownInput(s.to_string())),
        }
    }
}

/// Mass equivalents (kg) of every unit a commodity can be measured in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommodityDefinition {
    pub factors: BTreeMap<Unit, f64>,
}

impl CommodityDefinition {
    pub fn factor(&self, unit: Unit) -> Option<f64> {
        self.factors.get(&unit).copied()
    }

    pub fn units(&self) -> Vec<Unit> {
        self.factors.keys().copied().collect()
    }
}

/// Current local price of one sack of a commodity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub value: f64,
    #[serde(default = "PriceEntry::reference_unit")]
    pub unit: Unit,
    /// When the market data feed last set this price. `None` for shipped defaults.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl PriceEntry {
    pub fn per_sack(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Sack,
            updated_at: None,
        }
    }

    fn reference_unit() -> Unit {
        Unit::Sack
    }
}

/// Expected yield range in sacks per hectare.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductivityBenchmark {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputDefinition {
    pub price: f64,
    pub unit: Unit,
}

impl InputDefinition {
    pub fn unit_label(&self) -> &'static str {
        self.unit.as_str()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConversionResult {
    pub value: f64,
    pub from_unit: Unit,
    pub to_unit: Unit,
    pub commodity: Commodity,
    /// Quantity as supplied by the caller.
    pub input: f64,
    pub kilograms: f64,
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} = {} kg = {:.2} {}",
            self.input, self.from_unit, self.kilograms, self.value, self.to_unit
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValuationResult {
    /// Quantity expressed in sacks.
    pub quantity: f64,
    pub price_per_sack: f64,
    pub total_value: f64,
    pub commodity: Commodity,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarterGive {
    pub quantity: f64,
    pub unit: Unit,
    pub commodity: Commodity,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarterReceive {
    /// Quantity in sacks.
    pub quantity: f64,
    pub commodity: Commodity,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarterResult {
    pub give: BarterGive,
    pub receive: BarterReceive,
    /// Sacks of the received commodity per sack given, i.e.
    /// `give_price / receive_price`. Multiplying the sacks given by this rate
    /// yields the sacks received; the label is printed in the same direction.
    pub exchange_rate: f64,
    pub exchange_rate_label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    Good,
    Average,
    Low,
}

impl PerformanceTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Average => "average",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductivityResult {
    pub area: f64,
    pub production_in_sacks: f64,
    /// Sacks per hectare.
    pub productivity: f64,
    pub tier: PerformanceTier,
    pub benchmark: ProductivityBenchmark,
    pub commodity: Commodity,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputCostResult {
    pub input: InputKind,
    pub adjusted_quantity: f64,
    pub unit_label: &'static str,
    pub price_per_unit: f64,
    pub total_cost: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfitabilityResult {
    pub area: f64,
    pub commodity: Commodity,
    /// Sacks per hectare, as supplied.
    pub productivity: f64,
    /// Sacks.
    pub production: f64,
    pub revenue: f64,
    pub total_input_cost: f64,
    pub profit: f64,
    pub profit_margin_percent: f64,
    pub revenue_per_hectare: f64,
    pub profit_per_hectare: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_portuguese_names() {
        assert_eq!("soybean".parse::<Commodity>().unwrap(), Commodity::Soybean);
        assert_eq!("Soja".parse::<Commodity>().unwrap(), Commodity::Soybean);
        assert_eq!("acucar".parse::<Commodity>().unwrap(), Commodity::Sugar);
        assert_eq!("saca".parse::<Unit>().unwrap(), Unit::Sack);
        assert_eq!("kg".parse::<Unit>().unwrap(), Unit::Kilogram);
        assert_eq!("tonelada".parse::<Unit>().unwrap(), Unit::Tonne);
        assert_eq!("litro".parse::<Unit>().unwrap(), Unit::Litre);
        assert_eq!(
            "fertilizante_npk".parse::<InputKind>().unwrap(),
            InputKind::FertilizerNpk
        );
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert_eq!(
            "rice".parse::<Commodity>(),
            Err(MetricsError::UnknownCommodity("rice".to_string()))
        );
        assert_eq!(
            "gallon".parse::<Unit>(),
            Err(MetricsError::UnsupportedUnit {
                unit: "gallon".to_string(),
                commodity: None,
            })
        );
        assert_eq!(
            "lime".parse::<InputKind>(),
            Err(MetricsError::UnknownInput("lime".to_string()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for commodity in Commodity::ALL {
            assert_eq!(commodity.to_string().parse::<Commodity>().unwrap(), commodity);
        }
        for input in InputKind::ALL {
            assert_eq!(input.to_string().parse::<InputKind>().unwrap(), input);
        }
    }

    #[test]
    fn unsupported_unit_message_names_the_commodity() {
        let err = MetricsError::unsupported_unit(Unit::Bushel, Commodity::Coffee);
        assert_eq!(err.to_string(), "unit bushel is not supported for coffee");
        let err = "gallon".parse::<Unit>().unwrap_err();
        assert_eq!(err.to_string(), "unit gallon is not supported");
    }

    #[test]
    fn price_entries_default_to_sacks() {
        let entry: PriceEntry = serde_json::from_str(r#"{ "value": 10.5 }"#).unwrap();
        assert_eq!(entry, PriceEntry::per_sack(10.5));
    }
}
