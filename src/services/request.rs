use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Identifier attached to the tracing span of one recommendation request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Creates a new random request ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared flag a caller flips to abandon an in-flight request
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-request id, deadline and cancellation
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub id: RequestId,
    deadline: Option<Instant>,
    cancellation: Option<CancellationFlag>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Fails once the request was cancelled or its deadline has passed
    pub fn check(&self) -> AppResult<()> {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationFlag::is_cancelled)
        {
            return Err(AppError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(AppError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Span carrying the request id for everything logged during the request
    pub fn span(&self, operation: &'static str, title: &str) -> tracing::Span {
        tracing::info_span!(
            "recommendation_request",
            operation,
            title = %title,
            request_id = %self.id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_passes() {
        assert!(RequestContext::new().check().is_ok());
    }

    #[test]
    fn test_cancelled_context_fails() {
        let flag = CancellationFlag::new();
        let ctx = RequestContext::new().with_cancellation(flag.clone());
        assert!(ctx.check().is_ok());

        flag.cancel();
        assert!(matches!(ctx.check(), Err(AppError::Cancelled)));
    }

    #[test]
    fn test_elapsed_deadline_fails() {
        let ctx = RequestContext::new().with_deadline(Instant::now());
        assert!(matches!(ctx.check(), Err(AppError::DeadlineExceeded)));

        let ctx = RequestContext::new().with_timeout(Duration::from_secs(3600));
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }
}
