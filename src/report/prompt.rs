use chrono::{DateTime, Utc};

use crate::models::{GenerateReportRequest, IndicatorSnapshot, TradePoint};

pub fn system_prompt() -> &'static str {
    "You are a trading education specialist reviewing paper trades made by beginner investors. \
Give learning-focused feedback in a positive, constructive tone, with concrete suggestions on \
entry and exit timing and risk management. \
Always respond with a single valid JSON object only, no markdown formatting."
}

pub fn user_prompt(
    request: &GenerateReportRequest,
    buy: &IndicatorSnapshot,
    sell: &IndicatorSnapshot,
) -> String {
    format!(
        "Review this paper trade of {symbol}.

Trade summary:
- Symbol: {symbol}
- Period: {start} to {end}, {days} days in total
- Average buy price: ${avg_buy:.2}
- Average sell price: ${avg_sell:.2}
- Profit/loss rate: {pnl:+.2}%
- Invested amount: ${invested:.2}

Executions:
{executions}

Technical indicators:

At the buy ({buy_date}):
{buy_indicators}

At the sell ({sell_date}):
{sell_indicators}

Respond with exactly this JSON structure:

{{
  \"overallEvaluation\": \"overall assessment of the trade (3-5 sentences)\",
  \"buyAnalysis\": {{ }},
  \"buyEvaluation\": \"assessment of the buy timing (2-3 sentences)\",
  \"buyImprovement\": \"concrete improvements for the buy (2-3 sentences)\",
  \"sellAnalysis\": {{ }},
  \"sellEvaluation\": \"assessment of the sell timing (2-3 sentences)\",
  \"sellImprovement\": \"concrete improvements for the sell (2-3 sentences)\"
}}

Guidelines for buyAnalysis and sellAnalysis:
- Consider every indicator listed above
- Pick the 4 indicators that mattered most at that moment and explain each one
- Prefer indicators that drove the timing, gave a clear signal, or exposed risk
- Use only these keys: {keys}
- Each value is a short string; omit keys you do not use
- Respond with pure JSON and no surrounding text",
        symbol = request.symbol,
        start = request.start_date.format("%Y-%m-%d"),
        end = request.end_date.format("%Y-%m-%d"),
        days = request.holding_days(),
        avg_buy = request.average_buy_price,
        avg_sell = request.average_sell_price,
        pnl = request.profit_loss_rate,
        invested = request.total_investment_amount,
        executions = format_trade_points(&request.trade_points),
        buy_date = buy.date,
        buy_indicators = format_indicators(buy),
        sell_date = sell.date,
        sell_indicators = format_indicators(sell),
        keys = super::generator::POINT_ANALYSIS_KEYS.join(", "),
    )
}

/// One line per indicator group; undefined values are left out
pub fn format_indicators(snapshot: &IndicatorSnapshot) -> String {
    if snapshot.is_empty() {
        return "insufficient data".to_string();
    }

    let mut lines = vec![format!("Close: ${}", snapshot.close_price)];

    if let Some(rsi) = snapshot.rsi_14 {
        lines.push(format!("RSI(14): {}", rsi));
    }
    if let Some(macd) = snapshot.macd {
        lines.push(format!(
            "MACD: {}, Signal: {}, Histogram: {}",
            macd,
            display(snapshot.macd_signal),
            display(snapshot.macd_hist)
        ));
    }

    let sma = labelled(&[
        ("SMA20", snapshot.sma_20),
        ("SMA50", snapshot.sma_50),
        ("SMA200", snapshot.sma_200),
    ]);
    if !sma.is_empty() {
        lines.push(format!("Simple moving averages: {}", sma));
    }
    let ema = labelled(&[("EMA12", snapshot.ema_12), ("EMA26", snapshot.ema_26)]);
    if !ema.is_empty() {
        lines.push(format!("Exponential moving averages: {}", ema));
    }

    if let Some(upper) = snapshot.bb_upper {
        lines.push(format!(
            "Bollinger Bands: Upper {}, Middle {}, Lower {}",
            upper,
            display(snapshot.bb_middle),
            display(snapshot.bb_lower)
        ));
    }
    if let Some(k) = snapshot.stoch_k {
        lines.push(format!("Stochastic: K {}, D {}", k, display(snapshot.stoch_d)));
    }
    if let Some(adx) = snapshot.adx {
        lines.push(format!("ADX (trend strength): {}", adx));
    }
    if let Some(atr) = snapshot.atr {
        lines.push(format!("ATR (volatility): {}", atr));
    }
    if let Some(obv) = snapshot.obv {
        lines.push(format!("OBV: {}", obv));
    }
    if let Some(willr) = snapshot.willr {
        lines.push(format!("Williams %R: {}", willr));
    }
    if let Some(change) = snapshot.volume_change {
        lines.push(format!("Volume change: {:+.1}%", change));
    }

    lines.join("\n")
}

/// `n. YYYY-MM-DD HH:MM | BUY 10 @ $170.50`, numbered from 1
pub fn format_trade_points(points: &[TradePoint]) -> String {
    if points.is_empty() {
        return "no executions".to_string();
    }

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let time = DateTime::<Utc>::from_timestamp_millis(point.timestamp)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| point.timestamp.to_string());
            format!(
                "{}. {} | {} {} @ ${:.2}",
                i + 1,
                time,
                point.side.as_str(),
                point.quantity,
                point.price
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn labelled(values: &[(&str, Option<f64>)]) -> String {
    values
        .iter()
        .filter_map(|(label, value)| value.map(|v| format!("{}: {}", label, v)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn display(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}
