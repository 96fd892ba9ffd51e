use serde::{Deserialize, Serialize};

use super::conversion::convert;
use super::entities::{BarterGive, BarterReceive, BarterResult, Commodity, Unit, ValuationResult};
use super::error::MetricsError;
use super::tables::ReferenceTables;
use crate::util::round2;

/// Monetary value of a quantity at the current price per sack.
pub fn calculate_value(
    tables: &ReferenceTables,
    quantity: f64,
    unit: Unit,
    commodity: Commodity,
) -> Result<ValuationResult, MetricsError> {
    let in_sacks = convert(tables, quantity, unit, Unit::Sack, commodity)?;
    let price = tables.price(commodity)?;
    let total_value = in_sacks.value * price.value;

    Ok(ValuationResult {
        quantity: in_sacks.value,
        price_per_sack: price.value,
        total_value: round2(total_value),
        commodity,
    })
}

/// Swaps a quantity of one commodity for the same value of another.
pub fn calculate_barter(
    tables: &ReferenceTables,
    give_quantity: f64,
    give_unit: Unit,
    give_commodity: Commodity,
    receive_commodity: Commodity,
) -> Result<BarterResult, MetricsError> {
    tables.commodity(receive_commodity)?;
    let give_value = calculate_value(tables, give_quantity, give_unit, give_commodity)?;
    let receive_price = tables.price(receive_commodity)?.value;

    let receive_sacks = give_value.total_value / receive_price;
    // sacks of the received commodity per sack given
    let exchange_rate = give_value.price_per_sack / receive_price;

    Ok(BarterResult {
        give: BarterGive {
            quantity: give_quantity,
            unit: give_unit,
            commodity: give_commodity,
            value: give_value.total_value,
        },
        receive: BarterReceive {
            quantity: round2(receive_sacks),
            commodity: receive_commodity,
            value: give_value.total_value,
        },
        exchange_rate,
        exchange_rate_label: format!(
            "1 sack of {give_commodity} = {exchange_rate:.3} sacks of {receive_commodity}"
        ),
    })
}

/// Exchange price and port premium for one commodity, both in USD per bushel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardQuote {
    pub cme_usd_per_bushel: f64,
    #[serde(default)]
    pub premium_usd_per_bushel: f64,
}

/// Local price per sack implied by an exchange quote:
/// `(cme + premium) * bushels_per_sack * usd_brl`.
pub fn export_parity_price(
    tables: &ReferenceTables,
    commodity: Commodity,
    board: &BoardQuote,
    usd_brl: f64,
) -> Result<f64, MetricsError> {
    let sack = tables.factor(commodity, Unit::Sack)?;
    let bushel = tables.factor(commodity, Unit::Bushel)?;
    let bushels_per_sack = sack / bushel;
    let usd_per_bushel = board.cme_usd_per_bushel + board.premium_usd_per_bushel;

    Ok(round2(usd_per_bushel * bushels_per_sack * usd_brl))
}
