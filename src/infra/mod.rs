//! Collaborators outside the engine.

pub mod market;

pub use market::{
    ExportParity, FileQuoteProvider, MarketDataError, MarketDataProvider, MarketQuote,
    StaticQuoteProvider,
};
