use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::analysis::{TechnicalAnalysis, TradeAnalysis};
use crate::config::Settings;
use crate::llm::{
    CompletionBackend, CompletionFailure, OpenAIBackend, ResilientCompletionClient,
};
use crate::models::{GenerateReportRequest, GenerateReportResponse};

use super::prompt;

/// Keys the model may use inside `buyAnalysis` / `sellAnalysis`
pub const POINT_ANALYSIS_KEYS: [&str; 12] = [
    "rsi",
    "macd",
    "sma",
    "ema",
    "bollingerBands",
    "stochastic",
    "adx",
    "atr",
    "obv",
    "williamsR",
    "volume",
    "marketContext",
];

const LOGGED_REPLY_CHARS: usize = 500;

/// Model commentary on the indicators at one trade
///
/// Unknown keys are dropped; numbers or nested values are kept as their
/// JSON text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointAnalysis {
    #[serde(default, alias = "RSI", alias = "rsi_14", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub rsi: Option<String>,
    #[serde(default, alias = "MACD", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub macd: Option<String>,
    #[serde(default, alias = "SMA", alias = "movingAverages", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub sma: Option<String>,
    #[serde(default, alias = "EMA", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub ema: Option<String>,
    #[serde(default, alias = "bollinger", alias = "bb", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub bollinger_bands: Option<String>,
    #[serde(default, alias = "stoch", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub stochastic: Option<String>,
    #[serde(default, alias = "ADX", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub adx: Option<String>,
    #[serde(default, alias = "ATR", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub atr: Option<String>,
    #[serde(default, alias = "OBV", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub obv: Option<String>,
    #[serde(default, alias = "willr", alias = "williams_r", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub williams_r: Option<String>,
    #[serde(default, alias = "volumeChange", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, alias = "market", deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub market_context: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Structured reply expected from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContent {
    pub overall_evaluation: String,
    pub buy_analysis: PointAnalysis,
    pub buy_evaluation: String,
    pub buy_improvement: String,
    pub sell_analysis: PointAnalysis,
    pub sell_evaluation: String,
    pub sell_improvement: String,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Completion(#[from] CompletionFailure),

    #[error("malformed report: {0}")]
    MalformedReport(String),
}

impl ReportError {
    /// Coarse tag exposed to API clients
    pub fn error_type(&self) -> &'static str {
        match self {
            ReportError::Completion(failure) => failure.kind().as_str(),
            ReportError::MalformedReport(_) => "malformed_report",
        }
    }
}

/// Parse a model reply, tolerating a surrounding Markdown code fence
pub fn parse_report(reply: &str) -> Result<ReportContent, ReportError> {
    let body = strip_code_fence(reply);
    serde_json::from_str(body).map_err(|e| ReportError::MalformedReport(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string, e.g. ```json
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().trim_end_matches("```").trim()
}

/// Runs the indicator pipeline and asks the model for an evaluation
#[derive(Debug, Clone)]
pub struct ReportGenerator<B> {
    client: ResilientCompletionClient<B>,
    analysis: TechnicalAnalysis,
}

impl ReportGenerator<OpenAIBackend> {
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let backend = OpenAIBackend::from_settings(settings)?;
        Ok(Self::new(
            ResilientCompletionClient::new(backend, settings.retry_policy()),
            TechnicalAnalysis::from_settings(settings),
        ))
    }
}

impl<B: CompletionBackend> ReportGenerator<B> {
    pub fn new(client: ResilientCompletionClient<B>, analysis: TechnicalAnalysis) -> Self {
        Self { client, analysis }
    }

    /// Evaluate one trade cycle; returns the parsed report and tokens used
    pub async fn generate(
        &self,
        request: &GenerateReportRequest,
    ) -> Result<(ReportContent, u32), ReportError> {
        tracing::info!(
            trade_cycle_id = request.trade_cycle_id,
            symbol = %request.symbol,
            "report_generation_started"
        );

        let result = self.try_generate(request).await;
        match &result {
            Ok((_, tokens_used)) => tracing::info!(
                trade_cycle_id = request.trade_cycle_id,
                tokens_used,
                "report_generation_completed"
            ),
            Err(e) => tracing::error!(
                trade_cycle_id = request.trade_cycle_id,
                error = %e,
                error_type = e.error_type(),
                "report_generation_failed"
            ),
        }
        result
    }

    /// [`generate`](Self::generate) wrapped into the wire response
    pub async fn generate_response(
        &self,
        request: &GenerateReportRequest,
    ) -> Result<GenerateReportResponse, ReportError> {
        let (report, tokens_used) = self.generate(request).await?;
        Ok(GenerateReportResponse::from_report(
            request.trade_cycle_id,
            report,
            tokens_used,
        ))
    }

    async fn try_generate(
        &self,
        request: &GenerateReportRequest,
    ) -> Result<(ReportContent, u32), ReportError> {
        let TradeAnalysis { buy, sell } = self
            .analysis
            .calculate(&request.chart_data, &request.trade_points);

        let user_prompt = prompt::user_prompt(request, &buy, &sell);
        let completion = self
            .client
            .complete(prompt::system_prompt(), &user_prompt)
            .await?;

        let report = parse_report(&completion.text).inspect_err(|e| {
            let reply: String = completion.text.chars().take(LOGGED_REPLY_CHARS).collect();
            tracing::error!(error = %e, response = %reply, "json_parse_error");
        })?;

        Ok((report, completion.tokens_used))
    }
}
