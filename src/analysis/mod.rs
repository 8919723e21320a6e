//! Trade alignment and the technical-analysis pipeline built on it

pub mod aligner;
pub mod technical;

pub use aligner::{analyze_trade_point, first_trade_for_side, nearest_candle_index, snapshot_at};
pub use technical::{TechnicalAnalysis, TradeAnalysis};
