// Core modules
pub mod analysis;
pub mod config;
pub mod indicators;
pub mod llm;
pub mod models;
pub mod report;
pub mod sample;
pub mod series;
pub mod server;

// Re-export commonly used types
pub use analysis::{TechnicalAnalysis, TradeAnalysis};
pub use config::Settings;
pub use llm::{CompletionBackend, OpenAIBackend, ResilientCompletionClient, RetryPolicy};
pub use models::*;
pub use report::{ReportError, ReportGenerator};
