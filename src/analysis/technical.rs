use serde::Serialize;

use crate::config::Settings;
use crate::indicators::{compute_indicators, IndicatorParams};
use crate::models::{CandleData, IndicatorSnapshot, TradePoint, TradeSide};
use crate::series::{build_series, SeriesError, MIN_CANDLES};

use super::aligner::analyze_trade_point;

/// Indicator snapshots for the first buy and the first sell of a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TradeAnalysis {
    pub buy: IndicatorSnapshot,
    pub sell: IndicatorSnapshot,
}

/// Series Builder -> Indicator Engine -> Trade Aligner
#[derive(Debug, Clone)]
pub struct TechnicalAnalysis {
    params: IndicatorParams,
    min_candles: usize,
}

impl Default for TechnicalAnalysis {
    fn default() -> Self {
        Self::new(IndicatorParams::default(), MIN_CANDLES)
    }
}

impl TechnicalAnalysis {
    pub fn new(params: IndicatorParams, min_candles: usize) -> Self {
        Self {
            params,
            min_candles,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(IndicatorParams::default(), settings.min_candles)
    }

    /// Snapshot both sides of the cycle
    ///
    /// Never fails: a history that is too short or contains an unparsable
    /// candle yields empty snapshots for both sides.
    pub fn calculate(&self, chart_data: &[CandleData], trades: &[TradePoint]) -> TradeAnalysis {
        match self.try_calculate(chart_data, trades) {
            Ok(analysis) => analysis,
            Err(SeriesError::InsufficientHistory { candles, minimum }) => {
                tracing::warn!(candles, minimum, "insufficient_candle_data");
                TradeAnalysis::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "technical_analysis_failed");
                TradeAnalysis::default()
            }
        }
    }

    pub fn try_calculate(
        &self,
        chart_data: &[CandleData],
        trades: &[TradePoint],
    ) -> Result<TradeAnalysis, SeriesError> {
        let series = build_series(chart_data, self.min_candles)?;
        let columns = compute_indicators(&series, &self.params);

        let analysis = TradeAnalysis {
            buy: analyze_trade_point(&series, &columns, trades, TradeSide::Buy),
            sell: analyze_trade_point(&series, &columns, trades, TradeSide::Sell),
        };

        tracing::info!(
            candles = series.len(),
            buy_date = %analysis.buy.date,
            sell_date = %analysis.sell.date,
            "technical_indicators_calculated"
        );

        Ok(analysis)
    }
}
