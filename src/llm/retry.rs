//! Bounded exponential backoff around a [`CompletionBackend`]

use std::time::Duration;

use super::{Completion, CompletionBackend, CompletionError, CompletionFailure, FailureKind};

/// Attempt budget `N` and base delay `d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// At least one attempt is always made
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Wait after the failed 0-based `attempt`
    ///
    /// Rate limits: `d * 2^attempt * 2`. Timeouts and service errors:
    /// `d * 2^attempt`. Unexpected failures are never retried.
    pub fn delay_for(&self, kind: FailureKind, attempt: u32) -> Option<Duration> {
        let factor = 2u32.saturating_pow(attempt);
        let delay = match kind {
            FailureKind::RateLimit => self.base_delay.saturating_mul(factor).saturating_mul(2),
            FailureKind::Timeout | FailureKind::Service => self.base_delay.saturating_mul(factor),
            FailureKind::Unexpected => return None,
        };
        Some(delay)
    }
}

/// Retries a backend per [`RetryPolicy`]
///
/// Holds no mutable state; concurrent calls are independent. Dropping the
/// returned future abandons any remaining attempts and backoff sleeps.
#[derive(Debug, Clone)]
pub struct ResilientCompletionClient<B> {
    backend: B,
    policy: RetryPolicy,
}

impl<B: CompletionBackend> ResilientCompletionClient<B> {
    pub fn new(backend: B, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Completion, CompletionFailure> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            tracing::info!(
                attempt = attempt + 1,
                max_attempts,
                model = self.backend.model(),
                "openai_api_call_attempt"
            );

            let error = match self.backend.complete(system_prompt, user_prompt).await {
                Ok(completion) => {
                    tracing::info!(
                        attempt = attempt + 1,
                        tokens_used = completion.tokens_used,
                        "openai_api_call_success"
                    );
                    return Ok(completion);
                }
                Err(e) => e,
            };

            log_attempt_failure(&error, attempt);

            let made = attempt + 1;
            let delay = match self.policy.delay_for(error.kind(), attempt) {
                Some(delay) if made < max_attempts => delay,
                _ => {
                    tracing::error!(attempts = made, error = %error, "openai_api_call_failed");
                    return Err(CompletionFailure {
                        attempts: made,
                        last_error: error,
                    });
                }
            };

            tracing::debug!(delay_ms = delay.as_millis() as u64, "openai_retry_backoff");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn log_attempt_failure(error: &CompletionError, attempt: u32) {
    let attempt = attempt + 1;
    match error {
        CompletionError::RateLimited(_) => {
            tracing::warn!(attempt, error = %error, "openai_rate_limit_error")
        }
        CompletionError::Timeout(_) => {
            tracing::warn!(attempt, error = %error, "openai_timeout_error")
        }
        CompletionError::Service { status, .. } => {
            tracing::warn!(attempt, status = ?status, error = %error, "openai_api_error")
        }
        CompletionError::Unexpected(_) => {
            tracing::error!(attempt, error = %error, "unexpected_error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Replays a fixed sequence of outcomes, then keeps failing with a service error
    struct ScriptedBackend {
        outcomes: Mutex<VecDeque<Result<Completion, CompletionError>>>,
        calls: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(outcomes: Vec<Result<Completion, CompletionError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, _: &str, _: &str) -> Result<Completion, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.outcomes.lock().unwrap().pop_front();
            next.unwrap_or_else(|| {
                Err(CompletionError::Service {
                    status: Some(500),
                    message: "exhausted".into(),
                })
            })
        }
    }

    fn ok(text: &str) -> Result<Completion, CompletionError> {
        Ok(Completion {
            text: text.to_string(),
            tokens_used: 42,
        })
    }

    fn service() -> Result<Completion, CompletionError> {
        Err(CompletionError::Service {
            status: Some(502),
            message: "bad gateway".into(),
        })
    }

    fn client(
        outcomes: Vec<Result<Completion, CompletionError>>,
        attempts: u32,
    ) -> ResilientCompletionClient<ScriptedBackend> {
        ResilientCompletionClient::new(
            ScriptedBackend::new(outcomes),
            RetryPolicy::new(attempts, Duration::from_secs(1)),
        )
    }

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));

        assert_eq!(policy.delay_for(FailureKind::Service, 0), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_for(FailureKind::Timeout, 2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_for(FailureKind::RateLimit, 0), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for(FailureKind::RateLimit, 3), Some(Duration::from_secs(16)));
        assert_eq!(policy.delay_for(FailureKind::Unexpected, 0), None);
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[test]
    fn test_delay_saturates_instead_of_overflowing() {
        let policy = RetryPolicy::new(100, Duration::from_secs(1));
        assert!(policy.delay_for(FailureKind::RateLimit, 64).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_has_no_wait() {
        let client = client(vec![ok("done")], 3);
        let started = tokio::time::Instant::now();

        let completion = client.complete("sys", "user").await.unwrap();

        assert_eq!(completion.text, "done");
        assert_eq!(client.backend().calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_follow_failure_kind() {
        // rate limit after attempt 0 (2s), timeout after attempt 1 (2s)
        let client = client(
            vec![
                Err(CompletionError::RateLimited("429".into())),
                Err(CompletionError::Timeout("slow".into())),
                ok("recovered"),
            ],
            3,
        );
        let started = tokio::time::Instant::now();

        let completion = client.complete("sys", "user").await.unwrap();

        assert_eq!(completion.text, "recovered");
        assert_eq!(client.backend().calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_until_last_attempt_then_success() {
        // 2s + 4s + 8s before the fourth attempt
        let client = client(
            vec![
                Err(CompletionError::RateLimited("429".into())),
                Err(CompletionError::RateLimited("429".into())),
                Err(CompletionError::RateLimited("429".into())),
                ok("finally"),
            ],
            4,
        );
        let started = tokio::time::Instant::now();

        let completion = client.complete("sys", "user").await.unwrap();

        assert_eq!(completion.text, "finally");
        assert_eq!(client.backend().calls(), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error_without_final_sleep() {
        let client = client(
            vec![
                service(),
                service(),
                Err(CompletionError::Timeout("third".into())),
            ],
            3,
        );
        let started = tokio::time::Instant::now();

        let failure = client.complete("sys", "user").await.unwrap_err();

        assert_eq!(failure.attempts, 3);
        assert_eq!(failure.last_error, CompletionError::Timeout("third".into()));
        assert_eq!(client.backend().calls(), 3);
        // 1s + 2s, no sleep after the last attempt
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unexpected_error_is_not_retried() {
        let client = client(
            vec![Err(CompletionError::Unexpected("bug".into())), ok("never")],
            5,
        );

        let failure = client.complete("sys", "user").await.unwrap_err();

        assert_eq!(failure.attempts, 1);
        assert_eq!(client.backend().calls(), 1);
        assert_eq!(failure.last_error, CompletionError::Unexpected("bug".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_policy() {
        let client = client(vec![service(), ok("never")], 1);

        let failure = client.complete("sys", "user").await.unwrap_err();
        assert_eq!(failure.attempts, 1);
        assert_eq!(client.backend().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_call_stops_retries() {
        let client = client(vec![service(), service(), service(), service()], 4);

        // first backoff is 1s, second 2s; cancel in the middle of the second
        let result =
            tokio::time::timeout(Duration::from_millis(2500), client.complete("sys", "user")).await;
        assert!(result.is_err());
        assert_eq!(client.backend().calls(), 2);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(client.backend().calls(), 2);
    }
}
