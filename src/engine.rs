//! The engine instance that owns one set of reference tables.
//!
//! Calculations take a shared read lock, so they run concurrently and each
//! one sees a single consistent price table. Price updates take the write
//! lock and replace entries one commodity at a time.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::domain::{
    self, tables::is_valid_price, BarterResult, Commodity, ConversionResult, InputCostResult,
    InputKind, MetricsError, PriceEntry, ProductivityBenchmark, ProductivityResult,
    ProfitabilityResult, ReferenceTables, TableError, Unit, ValuationResult,
};
use crate::infra::market::{MarketDataError, MarketDataProvider, MarketQuote};
use crate::util::persistence::PriceSnapshot;

pub struct AgriMetrics {
    tables: RwLock<ReferenceTables>,
}

impl AgriMetrics {
    pub fn new(tables: ReferenceTables) -> Result<Self, TableError> {
        tables.validate()?;
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Engine over the tables shipped with the crate.
    pub fn with_builtin_tables() -> Result<Self, TableError> {
        Self::new(ReferenceTables::builtin()?)
    }

    // Writers only ever insert validated entries, so a poisoned lock still
    // guards a usable table.
    fn read(&self) -> RwLockReadGuard<'_, ReferenceTables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ReferenceTables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn convert(
        &self,
        value: f64,
        from_unit: Unit,
        to_unit: Unit,
        commodity: Commodity,
    ) -> Result<ConversionResult, MetricsError> {
        let result = domain::convert(&self.read(), value, from_unit, to_unit, commodity)?;
        debug!(%result, "converted");
        Ok(result)
    }

    pub fn calculate_value(
        &self,
        quantity: f64,
        unit: Unit,
        commodity: Commodity,
    ) -> Result<ValuationResult, MetricsError> {
        let result = domain::calculate_value(&self.read(), quantity, unit, commodity)?;
        debug!(%commodity, sacks = result.quantity, total = result.total_value, "valued");
        Ok(result)
    }

    pub fn calculate_barter(
        &self,
        give_quantity: f64,
        give_unit: Unit,
        give_commodity: Commodity,
        receive_commodity: Commodity,
    ) -> Result<BarterResult, MetricsError> {
        let result = domain::calculate_barter(
            &self.read(),
            give_quantity,
            give_unit,
            give_commodity,
            receive_commodity,
        )?;
        debug!(rate = %result.exchange_rate_label, value = result.give.value, "barter");
        Ok(result)
    }

    pub fn calculate_productivity(
        &self,
        area: f64,
        production: f64,
        unit: Unit,
        commodity: Commodity,
    ) -> Result<ProductivityResult, MetricsError> {
        let result =
            domain::calculate_productivity(&self.read(), area, production, unit, commodity)?;
        debug!(%commodity, productivity = result.productivity, tier = %result.tier, "productivity");
        Ok(result)
    }

    pub fn calculate_input_cost(
        &self,
        input: InputKind,
        quantity: f64,
        unit: Unit,
    ) -> Result<InputCostResult, MetricsError> {
        let result = domain::calculate_input_cost(&self.read(), input, quantity, unit)?;
        debug!(%input, total = result.total_cost, "input cost");
        Ok(result)
    }

    pub fn calculate_profitability(
        &self,
        area: f64,
        commodity: Commodity,
        productivity: f64,
        input_costs: &[InputCostResult],
    ) -> Result<ProfitabilityResult, MetricsError> {
        let result = domain::calculate_profitability(
            &self.read(),
            area,
            commodity,
            productivity,
            input_costs,
        )?;
        debug!(
            %commodity,
            profit = result.profit,
            margin = result.profit_margin_percent,
            "profitability"
        );
        Ok(result)
    }

    /// Applies a market quote to the price table.
    ///
    /// Only commodities named in the quote change. Direct local prices win over
    /// parity-derived ones; invalid entries are skipped and keep their old price.
    #[instrument(skip(self, quote), fields(source = %quote.source))]
    pub fn update_prices(&self, quote: &MarketQuote) {
        self.apply_quote(quote);
    }

    fn apply_quote(&self, quote: &MarketQuote) -> usize {
        let mut tables = self.write();
        let mut incoming: BTreeMap<Commodity, f64> = BTreeMap::new();

        if let Some(parity) = &quote.parity {
            for (&commodity, board) in &parity.boards {
                match domain::export_parity_price(&tables, commodity, board, parity.usd_brl) {
                    Ok(price) => {
                        incoming.insert(commodity, price);
                    }
                    Err(error) => warn!(%commodity, %error, "skipping parity board"),
                }
            }
        }
        incoming.extend(quote.local_prices.iter().map(|(&c, &p)| (c, p)));

        let mut updated = Vec::with_capacity(incoming.len());
        for (commodity, value) in incoming {
            if let Err(error) = tables.commodity(commodity) {
                warn!(%error, "skipping quote for undefined commodity");
                continue;
            }
            if !is_valid_price(value) {
                warn!(%commodity, value, "skipping invalid quoted price");
                continue;
            }
            tables.prices.insert(
                commodity,
                PriceEntry {
                    value,
                    unit: Unit::Sack,
                    updated_at: Some(quote.as_of),
                },
            );
            updated.push(commodity);
        }

        info!(?updated, "prices updated");
        updated.len()
    }

    /// Fetches a quote and applies it. The fetch runs without holding the lock.
    /// Returns how many commodities were repriced.
    pub async fn refresh_from<P>(&self, provider: &P) -> Result<usize, MarketDataError>
    where
        P: MarketDataProvider + ?Sized,
    {
        let quote = provider.fetch_quote().await?;
        debug!(provider = provider.name(), as_of = %quote.as_of, "quote fetched");
        Ok(self.apply_quote(&quote))
    }

    pub fn price_snapshot(&self) -> PriceSnapshot {
        PriceSnapshot::new(self.read().prices.clone())
    }

    /// Puts back prices from a snapshot. Commodities the snapshot does not
    /// mention keep their current price.
    #[instrument(skip(self, snapshot), fields(saved_at = %snapshot.saved_at))]
    pub fn restore_prices(&self, snapshot: &PriceSnapshot) {
        let mut tables = self.write();
        let mut restored = Vec::new();
        for (&commodity, entry) in &snapshot.prices {
            if tables.commodity(commodity).is_err() || !is_valid_price(entry.value) {
                warn!(%commodity, value = entry.value, "skipping snapshot entry");
                continue;
            }
            if entry.unit != Unit::Sack {
                warn!(%commodity, unit = %entry.unit, "skipping snapshot price not per sack");
                continue;
            }
            tables.prices.insert(commodity, entry.clone());
            restored.push(commodity);
        }
        info!(?restored, "prices restored");
    }

    pub fn price(&self, commodity: Commodity) -> Option<PriceEntry> {
        self.read().prices.get(&commodity).cloned()
    }

    pub fn benchmark(&self, commodity: Commodity) -> Option<ProductivityBenchmark> {
        self.read().benchmarks.get(&commodity).copied()
    }

    pub fn available_commodities(&self) -> Vec<Commodity> {
        self.read().available_commodities()
    }

    pub fn available_units(&self, commodity: Commodity) -> Result<Vec<Unit>, MetricsError> {
        self.read().available_units(commodity)
    }

    pub fn available_inputs(&self) -> Vec<InputKind> {
        self.read().available_inputs()
    }

    /// Time of the most recent feed-driven price change, if any.
    pub fn last_price_update(&self) -> Option<OffsetDateTime> {
        self.read()
            .prices
            .values()
            .filter_map(|entry| entry.updated_at)
            .max()
    }
}
