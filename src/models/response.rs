use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::{PointAnalysis, ReportContent};

/// Evaluation returned to the caller for one trade cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportResponse {
    pub success: bool,
    pub trade_cycle_id: i64,
    pub overall_evaluation: String,
    pub buy_analysis: PointAnalysis,
    pub buy_evaluation: String,
    pub buy_improvement: String,
    pub sell_analysis: PointAnalysis,
    pub sell_evaluation: String,
    pub sell_improvement: String,
    pub generated_at: DateTime<Utc>,
    pub tokens_used: u32,
}

impl GenerateReportResponse {
    pub fn from_report(trade_cycle_id: i64, report: ReportContent, tokens_used: u32) -> Self {
        Self {
            success: true,
            trade_cycle_id,
            overall_evaluation: report.overall_evaluation,
            buy_analysis: report.buy_analysis,
            buy_evaluation: report.buy_evaluation,
            buy_improvement: report.buy_improvement,
            sell_analysis: report.sell_analysis,
            sell_evaluation: report.sell_evaluation,
            sell_improvement: report.sell_improvement,
            generated_at: Utc::now(),
            tokens_used,
        }
    }
}
