//! Computes the full indicator battery over a series as aligned columns

use crate::series::Series;

use super::{
    calculate_adx, calculate_atr, calculate_bollinger_bands, calculate_ema, calculate_macd,
    calculate_obv, calculate_rsi, calculate_sma, calculate_stochastic, calculate_volume_change,
    calculate_williams_r,
};

/// One output column of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorColumn {
    Rsi14,
    Macd,
    MacdSignal,
    MacdHist,
    Sma20,
    Sma50,
    Sma200,
    Ema12,
    Ema26,
    BbUpper,
    BbMiddle,
    BbLower,
    StochK,
    StochD,
    Adx,
    Atr,
    Obv,
    Willr,
    VolumeChange,
}

impl IndicatorColumn {
    pub const ALL: [IndicatorColumn; 19] = [
        IndicatorColumn::Rsi14,
        IndicatorColumn::Macd,
        IndicatorColumn::MacdSignal,
        IndicatorColumn::MacdHist,
        IndicatorColumn::Sma20,
        IndicatorColumn::Sma50,
        IndicatorColumn::Sma200,
        IndicatorColumn::Ema12,
        IndicatorColumn::Ema26,
        IndicatorColumn::BbUpper,
        IndicatorColumn::BbMiddle,
        IndicatorColumn::BbLower,
        IndicatorColumn::StochK,
        IndicatorColumn::StochD,
        IndicatorColumn::Adx,
        IndicatorColumn::Atr,
        IndicatorColumn::Obv,
        IndicatorColumn::Willr,
        IndicatorColumn::VolumeChange,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorColumn::Rsi14 => "rsi_14",
            IndicatorColumn::Macd => "macd",
            IndicatorColumn::MacdSignal => "macd_signal",
            IndicatorColumn::MacdHist => "macd_hist",
            IndicatorColumn::Sma20 => "sma_20",
            IndicatorColumn::Sma50 => "sma_50",
            IndicatorColumn::Sma200 => "sma_200",
            IndicatorColumn::Ema12 => "ema_12",
            IndicatorColumn::Ema26 => "ema_26",
            IndicatorColumn::BbUpper => "bb_upper",
            IndicatorColumn::BbMiddle => "bb_middle",
            IndicatorColumn::BbLower => "bb_lower",
            IndicatorColumn::StochK => "stoch_k",
            IndicatorColumn::StochD => "stoch_d",
            IndicatorColumn::Adx => "adx",
            IndicatorColumn::Atr => "atr",
            IndicatorColumn::Obv => "obv",
            IndicatorColumn::Willr => "willr",
            IndicatorColumn::VolumeChange => "volume_change",
        }
    }

    /// Decimal places used when the value is presented in a snapshot
    pub fn decimals(&self) -> u32 {
        match self {
            IndicatorColumn::Macd | IndicatorColumn::MacdSignal | IndicatorColumn::MacdHist => 4,
            IndicatorColumn::Obv => 0,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub sma_periods: [usize; 3],
    pub ema_periods: [usize; 2],
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub stoch_k_period: usize,
    pub stoch_smooth_k: usize,
    pub stoch_d_period: usize,
    pub adx_period: usize,
    pub atr_period: usize,
    pub willr_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            sma_periods: [20, 50, 200],
            ema_periods: [12, 26],
            bb_period: 20,
            bb_std_dev: 2.0,
            stoch_k_period: 14,
            stoch_smooth_k: 3,
            stoch_d_period: 3,
            adx_period: 14,
            atr_period: 14,
            willr_period: 14,
        }
    }
}

/// Full-precision indicator output, one entry per candle
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorColumns {
    pub rsi_14: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_hist: Vec<Option<f64>>,
    pub sma_20: Vec<Option<f64>>,
    pub sma_50: Vec<Option<f64>>,
    pub sma_200: Vec<Option<f64>>,
    pub ema_12: Vec<Option<f64>>,
    pub ema_26: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub stoch_k: Vec<Option<f64>>,
    pub stoch_d: Vec<Option<f64>>,
    pub adx: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub obv: Vec<Option<f64>>,
    pub willr: Vec<Option<f64>>,
    pub volume_change: Vec<Option<f64>>,
}

impl IndicatorColumns {
    pub fn column(&self, column: IndicatorColumn) -> &[Option<f64>] {
        match column {
            IndicatorColumn::Rsi14 => &self.rsi_14,
            IndicatorColumn::Macd => &self.macd,
            IndicatorColumn::MacdSignal => &self.macd_signal,
            IndicatorColumn::MacdHist => &self.macd_hist,
            IndicatorColumn::Sma20 => &self.sma_20,
            IndicatorColumn::Sma50 => &self.sma_50,
            IndicatorColumn::Sma200 => &self.sma_200,
            IndicatorColumn::Ema12 => &self.ema_12,
            IndicatorColumn::Ema26 => &self.ema_26,
            IndicatorColumn::BbUpper => &self.bb_upper,
            IndicatorColumn::BbMiddle => &self.bb_middle,
            IndicatorColumn::BbLower => &self.bb_lower,
            IndicatorColumn::StochK => &self.stoch_k,
            IndicatorColumn::StochD => &self.stoch_d,
            IndicatorColumn::Adx => &self.adx,
            IndicatorColumn::Atr => &self.atr,
            IndicatorColumn::Obv => &self.obv,
            IndicatorColumn::Willr => &self.willr,
            IndicatorColumn::VolumeChange => &self.volume_change,
        }
    }

    /// Value of `column` at candle `index`; `None` if undefined or out of range
    pub fn value_at(&self, column: IndicatorColumn, index: usize) -> Option<f64> {
        self.column(column).get(index).copied().flatten()
    }

    /// Number of candles covered
    pub fn len(&self) -> usize {
        self.rsi_14.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi_14.is_empty()
    }
}

/// Compute every indicator column over the series
///
/// Pure function of its inputs: indicators are computed from unrounded
/// inputs and never feed rounded values into one another.
pub fn compute_indicators(series: &Series, params: &IndicatorParams) -> IndicatorColumns {
    let candles = series.candles();
    let closes = series.closes();
    let volumes = series.volumes();

    let [sma_short, sma_mid, sma_long] = params.sma_periods;
    let [ema_fast, ema_slow] = params.ema_periods;

    let macd = calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    let bands = calculate_bollinger_bands(&closes, params.bb_period, params.bb_std_dev);
    let stoch = calculate_stochastic(
        candles,
        params.stoch_k_period,
        params.stoch_smooth_k,
        params.stoch_d_period,
    );

    IndicatorColumns {
        rsi_14: calculate_rsi(&closes, params.rsi_period),
        macd: macd.macd,
        macd_signal: macd.signal,
        macd_hist: macd.histogram,
        sma_20: calculate_sma(&closes, sma_short),
        sma_50: calculate_sma(&closes, sma_mid),
        sma_200: calculate_sma(&closes, sma_long),
        ema_12: calculate_ema(&closes, ema_fast),
        ema_26: calculate_ema(&closes, ema_slow),
        bb_upper: bands.upper,
        bb_middle: bands.middle,
        bb_lower: bands.lower,
        stoch_k: stoch.k,
        stoch_d: stoch.d,
        adx: calculate_adx(candles, params.adx_period),
        atr: calculate_atr(candles, params.atr_period),
        obv: calculate_obv(&closes, &volumes),
        willr: calculate_williams_r(candles, params.willr_period),
        volume_change: calculate_volume_change(&volumes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candle;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn linear_series(len: usize) -> Series {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles = (0..len)
            .map(|i| {
                let close = 100.0 + i as f64;
                Candle {
                    timestamp: start + Duration::hours(i as i64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000.0 + (i % 7) as f64 * 50.0,
                }
            })
            .collect();
        Series::from_candles(candles)
    }

    #[test]
    fn test_all_columns_aligned_to_series() {
        let series = linear_series(60);
        let columns = compute_indicators(&series, &IndicatorParams::default());

        assert_eq!(columns.len(), 60);
        for column in IndicatorColumn::ALL {
            assert_eq!(columns.column(column).len(), 60, "{}", column.name());
        }
    }

    #[test]
    fn test_compute_is_deterministic() {
        let series = linear_series(80);
        let params = IndicatorParams::default();

        assert_eq!(
            compute_indicators(&series, &params),
            compute_indicators(&series, &params)
        );
    }

    #[test]
    fn test_sma_20_first_defined_value() {
        let series = linear_series(30);
        let columns = compute_indicators(&series, &IndicatorParams::default());

        assert_eq!(columns.value_at(IndicatorColumn::Sma20, 18), None);
        // mean of 100..=119
        assert_relative_eq!(
            columns.value_at(IndicatorColumn::Sma20, 19).unwrap(),
            109.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_rsi_of_steady_uptrend_is_maximal() {
        let series = linear_series(25);
        let columns = compute_indicators(&series, &IndicatorParams::default());

        assert_relative_eq!(
            columns.value_at(IndicatorColumn::Rsi14, 24).unwrap(),
            100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_long_lookbacks_undefined_on_short_history() {
        let series = linear_series(30);
        let columns = compute_indicators(&series, &IndicatorParams::default());

        assert!(columns.sma_200.iter().all(Option::is_none));
        assert!(columns.sma_50.iter().all(Option::is_none));
        assert!(columns.macd_signal.iter().all(Option::is_none));
        assert!(columns.value_at(IndicatorColumn::Macd, 25).is_some());
        assert!(columns.value_at(IndicatorColumn::Obv, 0).is_some());
    }

    #[test]
    fn test_value_at_out_of_range() {
        let series = linear_series(20);
        let columns = compute_indicators(&series, &IndicatorParams::default());

        assert_eq!(columns.value_at(IndicatorColumn::Obv, 20), None);
    }

    #[test]
    fn test_column_presentation_precision() {
        assert_eq!(IndicatorColumn::MacdHist.decimals(), 4);
        assert_eq!(IndicatorColumn::Obv.decimals(), 0);
        assert_eq!(IndicatorColumn::Atr.decimals(), 2);
        assert_eq!(IndicatorColumn::VolumeChange.name(), "volume_change");
    }
}
