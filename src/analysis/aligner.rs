//! Trade Aligner: maps a trade onto the nearest candle and reads off its indicators

use crate::indicators::{IndicatorColumn, IndicatorColumns};
use crate::models::{IndicatorSnapshot, TradePoint, TradeSide};
use crate::series::Series;

/// First trade of `side` in input order
pub fn first_trade_for_side(trades: &[TradePoint], side: TradeSide) -> Option<&TradePoint> {
    trades.iter().find(|trade| trade.side == side)
}

/// Index of the candle closest in time to `timestamp_ms`
///
/// Ties resolve to the lower index. Returns `None` for an empty series.
pub fn nearest_candle_index(series: &Series, timestamp_ms: i64) -> Option<usize> {
    series
        .candles()
        .iter()
        .enumerate()
        .min_by_key(|(_, candle)| candle.timestamp.timestamp_millis().abs_diff(timestamp_ms))
        .map(|(index, _)| index)
}

/// Snapshot of every indicator at candle `index`, rounded for presentation
pub fn snapshot_at(series: &Series, columns: &IndicatorColumns, index: usize) -> IndicatorSnapshot {
    let Some(candle) = series.candles().get(index) else {
        return IndicatorSnapshot::empty();
    };
    let value = |column: IndicatorColumn| {
        columns
            .value_at(column, index)
            .map(|v| round_to(v, column.decimals()))
    };

    IndicatorSnapshot {
        date: candle.timestamp.format("%Y-%m-%d").to_string(),
        close_price: round_to(candle.close, 2),
        volume: Some(round_to(candle.volume, 2)),
        rsi_14: value(IndicatorColumn::Rsi14),
        macd: value(IndicatorColumn::Macd),
        macd_signal: value(IndicatorColumn::MacdSignal),
        macd_hist: value(IndicatorColumn::MacdHist),
        sma_20: value(IndicatorColumn::Sma20),
        sma_50: value(IndicatorColumn::Sma50),
        sma_200: value(IndicatorColumn::Sma200),
        ema_12: value(IndicatorColumn::Ema12),
        ema_26: value(IndicatorColumn::Ema26),
        bb_upper: value(IndicatorColumn::BbUpper),
        bb_middle: value(IndicatorColumn::BbMiddle),
        bb_lower: value(IndicatorColumn::BbLower),
        stoch_k: value(IndicatorColumn::StochK),
        stoch_d: value(IndicatorColumn::StochD),
        adx: value(IndicatorColumn::Adx),
        atr: value(IndicatorColumn::Atr),
        obv: value(IndicatorColumn::Obv),
        willr: value(IndicatorColumn::Willr),
        volume_change: value(IndicatorColumn::VolumeChange),
    }
}

/// Snapshot for the first `side` trade, or the empty sentinel if there is none
pub fn analyze_trade_point(
    series: &Series,
    columns: &IndicatorColumns,
    trades: &[TradePoint],
    side: TradeSide,
) -> IndicatorSnapshot {
    first_trade_for_side(trades, side)
        .and_then(|trade| nearest_candle_index(series, trade.timestamp))
        .map(|index| snapshot_at(series, columns, index))
        .unwrap_or_else(IndicatorSnapshot::empty)
}

/// Half-to-even, so exact halves round toward the even digit
fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}
