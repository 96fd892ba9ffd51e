//! Market data seam.
//!
//! - `MarketQuote` is the plain value handed to the engine's price update.
//! - Providers produce quotes; fetching stays outside the engine's lock.

use std::{collections::BTreeMap, path::PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::domain::{BoardQuote, Commodity};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("failed to read quote: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode quote: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid quote timestamp: {0}")]
    Timestamp(#[from] time::error::Parse),
    #[error("market data unavailable: {0}")]
    Unavailable(String),
}

/// Exchange board converted to local prices with a USD/BRL rate.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportParity {
    pub usd_brl: f64,
    pub boards: BTreeMap<Commodity, BoardQuote>,
}

/// Prices observed by a market data feed at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketQuote {
    pub source: String,
    pub as_of: OffsetDateTime,
    /// Local prices in BRL per sack.
    pub local_prices: BTreeMap<Commodity, f64>,
    pub parity: Option<ExportParity>,
}

impl MarketQuote {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            as_of: OffsetDateTime::now_utc(),
            local_prices: BTreeMap::new(),
            parity: None,
        }
    }

    pub fn with_local_price(mut self, commodity: Commodity, price_per_sack: f64) -> Self {
        self.local_prices.insert(commodity, price_per_sack);
        self
    }

    pub fn with_parity(mut self, parity: ExportParity) -> Self {
        self.parity = Some(parity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.local_prices.is_empty()
            && self
                .parity
                .as_ref()
                .map(|parity| parity.boards.is_empty())
                .unwrap_or(true)
    }

    /// Parses a quote document. Commodity keys the engine does not know are
    /// dropped with a warning; feeds often carry more than we trade.
    pub fn from_json(bytes: &[u8]) -> Result<Self, MarketDataError> {
        let dto: QuoteDto = serde_json::from_slice(bytes)?;
        let as_of = match dto.as_of.as_deref() {
            Some(raw) => OffsetDateTime::parse(raw, &Rfc3339)?,
            None => OffsetDateTime::now_utc(),
        };

        let local_prices = dto
            .local_prices
            .into_iter()
            .filter_map(|(name, price)| known_commodity(&name).map(|c| (c, price.0)))
            .collect();

        let parity = dto.export_parity.map(|parity| ExportParity {
            usd_brl: parity.usd_brl.0,
            boards: parity
                .boards
                .into_iter()
                .filter_map(|(name, board)| known_commodity(&name).map(|c| (c, board)))
                .collect(),
        });

        Ok(Self {
            source: dto.source.unwrap_or_else(|| "unknown".to_string()),
            as_of,
            local_prices,
            parity,
        })
    }
}

fn known_commodity(name: &str) -> Option<Commodity> {
    match name.parse::<Commodity>() {
        Ok(commodity) => Some(commodity),
        Err(error) => {
            warn!(%error, "ignoring quote entry");
            None
        }
    }
}

/// The external collaborator that supplies spot prices and exchange rates.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_quote(&self) -> Result<MarketQuote, MarketDataError>;
}

/// Always returns the same quote. Useful offline and in tests.
#[derive(Clone, Debug)]
pub struct StaticQuoteProvider {
    quote: MarketQuote,
}

impl StaticQuoteProvider {
    pub fn new(quote: MarketQuote) -> Self {
        Self { quote }
    }
}

#[async_trait]
impl MarketDataProvider for StaticQuoteProvider {
    fn name(&self) -> &str {
        &self.quote.source
    }

    async fn fetch_quote(&self) -> Result<MarketQuote, MarketDataError> {
        Ok(self.quote.clone())
    }
}

/// Reads a quote document that some other process drops on disk.
#[derive(Clone, Debug)]
pub struct FileQuoteProvider {
    path: PathBuf,
}

impl FileQuoteProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MarketDataProvider for FileQuoteProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_quote(&self) -> Result<MarketQuote, MarketDataError> {
        debug!(path = %self.path.display(), "reading quote document");
        let bytes = tokio::fs::read(&self.path).await?;
        let quote = MarketQuote::from_json(&bytes)?;
        if quote.is_empty() {
            return Err(MarketDataError::Unavailable(format!(
                "{} carries no known prices",
                self.path.display()
            )));
        }
        Ok(quote)
    }
}

#[derive(Debug, Deserialize)]
struct QuoteDto {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    as_of: Option<String>,
    #[serde(default)]
    local_prices: BTreeMap<String, Number>,
    #[serde(default)]
    export_parity: Option<ExportParityDto>,
}

#[derive(Debug, Deserialize)]
struct ExportParityDto {
    usd_brl: Number,
    #[serde(default)]
    boards: BTreeMap<String, BoardQuote>,
}

/// A price written either as a JSON number or as a string, including the
/// local `1.234,56` style.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Number(f64);

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct NumberOrString;

        impl<'de> serde::de::Visitor<'de> for NumberOrString {
            type Value = Number;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number or numeric string")
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Number(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Number(value as f64))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Number(value as f64))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                parse_decimal(value)
                    .map(Number)
                    .ok_or_else(|| E::invalid_value(serde::de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_any(NumberOrString)
    }
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return Some(value);
    }
    let last_comma = trimmed.rfind(',')?;
    let normalized = match trimmed.rfind('.') {
        // 1,234.56 -> 1234.56
        Some(last_dot) if last_dot > last_comma => trimmed.replace(',', ""),
        // 1.234,56 -> 1234.56
        _ => trimmed.replace('.', "").replace(',', "."),
    };
    normalized.parse::<f64>().ok()
}
