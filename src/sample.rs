//! Seeded synthetic trade cycles for tests and offline runs

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

use crate::models::{Candle, CandleData, GenerateReportRequest, TradePoint, TradeSide};

/// 2024-01-01T00:00:00Z, in days since the Unix epoch
const START_DAY: i64 = 19_723;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketScenario {
    /// Steady uptrend with noise (+2% per day)
    Uptrend,
    /// Steady downtrend with noise (-2% per day)
    Downtrend,
    /// Mean-reverting chop around the start price
    Sideways,
    /// Large swings (up to ±5% per candle)
    Volatile,
}

impl MarketScenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketScenario::Uptrend => "uptrend",
            MarketScenario::Downtrend => "downtrend",
            MarketScenario::Sideways => "sideways",
            MarketScenario::Volatile => "volatile",
        }
    }
}

impl fmt::Display for MarketScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uptrend" => Ok(MarketScenario::Uptrend),
            "downtrend" => Ok(MarketScenario::Downtrend),
            "sideways" => Ok(MarketScenario::Sideways),
            "volatile" => Ok(MarketScenario::Volatile),
            other => Err(format!(
                "unknown scenario '{}', expected uptrend, downtrend, sideways or volatile",
                other
            )),
        }
    }
}

pub struct SyntheticCycleGenerator {
    rng: StdRng,
    base_price: f64,
    base_volume: f64,
}

impl SyntheticCycleGenerator {
    /// Same seed, same output
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 150.0,
            base_volume: 1_000_000.0,
        }
    }

    /// Candles starting 2024-01-01 UTC, `interval_minutes` apart
    pub fn generate_candles(
        &mut self,
        scenario: MarketScenario,
        num_candles: usize,
        interval_minutes: i64,
    ) -> Vec<Candle> {
        let start_time = DateTime::<Utc>::default() + Duration::days(START_DAY);
        let intervals_per_day = (24.0 * 60.0 / interval_minutes.max(1) as f64).max(1.0);
        let mut price = self.base_price;

        (0..num_candles)
            .map(|i| {
                let timestamp = start_time + Duration::minutes(i as i64 * interval_minutes);
                price = self.next_price(scenario, price, intervals_per_day);
                self.create_candle(price, timestamp)
            })
            .collect()
    }

    /// A complete request: buy a quarter of the way in, sell at three quarters
    pub fn generate_cycle(
        &mut self,
        scenario: MarketScenario,
        num_candles: usize,
        interval_minutes: i64,
    ) -> GenerateReportRequest {
        let candles = self.generate_candles(scenario, num_candles.max(1), interval_minutes);
        let buy = &candles[candles.len() / 4];
        let sell = &candles[candles.len() * 3 / 4];
        let quantity = 10.0;

        GenerateReportRequest {
            trade_cycle_id: 1,
            symbol: "SYNTH".to_string(),
            start_date: buy.timestamp.naive_utc(),
            end_date: sell.timestamp.naive_utc(),
            profit_loss_rate: (sell.close - buy.close) / buy.close * 100.0,
            average_buy_price: buy.close,
            average_sell_price: sell.close,
            total_investment_amount: buy.close * quantity,
            trade_points: vec![
                TradePoint {
                    timestamp: buy.timestamp.timestamp_millis(),
                    side: TradeSide::Buy,
                    price: buy.close,
                    quantity,
                },
                TradePoint {
                    timestamp: sell.timestamp.timestamp_millis(),
                    side: TradeSide::Sell,
                    price: sell.close,
                    quantity,
                },
            ],
            chart_data: candles.iter().map(to_candle_data).collect(),
        }
    }

    fn next_price(&mut self, scenario: MarketScenario, price: f64, intervals_per_day: f64) -> f64 {
        let next = match scenario {
            MarketScenario::Uptrend => {
                price * (1.0 + 0.02 / intervals_per_day + self.rng.gen_range(-0.001..0.001))
            }
            MarketScenario::Downtrend => {
                price * (1.0 - 0.02 / intervals_per_day + self.rng.gen_range(-0.001..0.001))
            }
            MarketScenario::Sideways => {
                let reversion = (self.base_price - price) * 0.1;
                price + reversion + price * self.rng.gen_range(-0.01..0.01)
            }
            MarketScenario::Volatile => price * (1.0 + self.rng.gen_range(-0.05..0.05)),
        };
        next.max(0.01)
    }

    fn create_candle(&mut self, price: f64, timestamp: DateTime<Utc>) -> Candle {
        let noise_pct = 0.002;

        let high = price * (1.0 + self.rng.gen_range(0.0..noise_pct));
        let low = price * (1.0 - self.rng.gen_range(0.0..noise_pct));
        let open = (price * (1.0 + self.rng.gen_range(-noise_pct..noise_pct))).clamp(low, high);
        let volume = self.base_volume * self.rng.gen_range(0.7..1.3);

        Candle {
            timestamp,
            open,
            high,
            low,
            close: price,
            volume,
        }
    }
}

fn to_candle_data(candle: &Candle) -> CandleData {
    CandleData {
        timestamp: candle.timestamp.timestamp_millis(),
        open: format!("{:.4}", candle.open),
        high: format!("{:.4}", candle.high),
        low: format!("{:.4}", candle.low),
        close: format!("{:.4}", candle.close),
        volume: format!("{:.2}", candle.volume),
    }
}
