pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod quote;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{Decimal, Mint, Side, TimeMs, Trade};
pub use engine::{PnlSnapshot, Position};
pub use error::EngineError;
pub use orchestration::{Execution, TradeEngine};
pub use quote::{JupiterQuoteSource, MockQuoteSource, QuoteError, QuoteSource};
