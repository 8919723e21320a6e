//! Text-generation capability and the retrying client around it

use std::future::Future;

pub mod error;
pub mod openai;
pub mod retry;

pub use error::{CompletionError, CompletionFailure, FailureKind};
pub use openai::OpenAIBackend;
pub use retry::{ResilientCompletionClient, RetryPolicy};

/// Generated text plus token usage
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Completion {
    /// May be empty if the upstream returned no content
    pub text: String,
    /// Zero when usage metadata is absent
    pub tokens_used: u32,
}

/// A single, non-retrying call to a text-generation service
pub trait CompletionBackend: Send + Sync {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<Completion, CompletionError>> + Send;

    /// Model identifier, used for logging
    fn model(&self) -> &str {
        "unknown"
    }
}
