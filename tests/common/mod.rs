#![allow(dead_code)]

use std::collections::HashMap;

use trade_report::analysis::TechnicalAnalysis;
use trade_report::llm::{Completion, CompletionBackend, CompletionError};
use trade_report::models::GenerateReportRequest;
use trade_report::sample::{MarketScenario, SyntheticCycleGenerator};
use trade_report::{ReportGenerator, ResilientCompletionClient, RetryPolicy, Settings};

pub const REPORT_JSON: &str = r#"{
  "overallEvaluation": "A disciplined trend-following cycle.",
  "buyAnalysis": {"rsi": "RSI was neutral at entry", "macd": "MACD had just crossed above its signal"},
  "buyEvaluation": "Entry followed the trend.",
  "buyImprovement": "Wait for a pullback toward SMA20.",
  "sellAnalysis": {"adx": "ADX above 25 showed a strong trend", "volume": 12.5},
  "sellEvaluation": "Exit locked in gains.",
  "sellImprovement": "A trailing stop could have captured more of the move."
}"#;

pub fn settings(extra: &[(&str, &str)]) -> Settings {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("OPENAI_API_KEY".into(), "sk-test".into());
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }
    Settings::from_map(vars).expect("test settings")
}

pub fn uptrend_request() -> GenerateReportRequest {
    SyntheticCycleGenerator::new(42).generate_cycle(MarketScenario::Uptrend, 120, 1440)
}

/// Chat-completions body wrapping `content`
pub fn chat_body(content: &str, total_tokens: u32) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": total_tokens / 2, "completion_tokens": total_tokens - total_tokens / 2, "total_tokens": total_tokens}
    })
    .to_string()
}

/// Returns the same outcome on every call
pub struct FixedBackend {
    outcome: Result<Completion, CompletionError>,
}

impl FixedBackend {
    pub fn replying(text: &str, tokens_used: u32) -> Self {
        Self {
            outcome: Ok(Completion {
                text: text.to_string(),
                tokens_used,
            }),
        }
    }

    pub fn failing(error: CompletionError) -> Self {
        Self { outcome: Err(error) }
    }
}

impl CompletionBackend for FixedBackend {
    async fn complete(&self, _: &str, _: &str) -> Result<Completion, CompletionError> {
        self.outcome.clone()
    }
}

pub fn fixed_generator(backend: FixedBackend) -> ReportGenerator<FixedBackend> {
    ReportGenerator::new(
        ResilientCompletionClient::new(backend, RetryPolicy::new(1, std::time::Duration::ZERO)),
        TechnicalAnalysis::default(),
    )
}
