use crate::core::matcher::{MatchError, Matcher};
use crate::models::{MatchRequest, MatchResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Applies the resolution pipeline across many requests.
///
/// Items run on a fixed-size pool of workers so batch size never
/// dictates index load. Each item is isolated: one failure becomes a
/// per-item error while the rest still resolve. Output order always
/// matches input order regardless of completion order.
pub struct BatchCoordinator {
    matcher: Arc<Matcher>,
    concurrency: usize,
    timeout: Duration,
}

impl BatchCoordinator {
    pub fn new(matcher: Arc<Matcher>, concurrency: usize, timeout: Duration) -> Self {
        Self {
            matcher,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    /// Resolve every request, one result-or-error per input, in input
    /// order. Items unfinished at the batch deadline come back as
    /// per-item timeout errors; completed items keep their results.
    pub async fn resolve_batch(
        &self,
        requests: Vec<MatchRequest>,
    ) -> Vec<Result<MatchResult, MatchError>> {
        let total = requests.len();
        let mut slots: Vec<Option<Result<MatchResult, MatchError>>> =
            (0..total).map(|_| None).collect();

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks: JoinSet<(usize, Result<MatchResult, MatchError>)> = JoinSet::new();
        let mut positions: HashMap<tokio::task::Id, usize> = HashMap::with_capacity(total);

        for (position, request) in requests.into_iter().enumerate() {
            let matcher = Arc::clone(&self.matcher);
            let semaphore = Arc::clone(&semaphore);

            let handle = tasks.spawn(async move {
                // Closed only when the whole set is aborted, at which
                // point this task never reports anyway.
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (position, Err(MatchError::Timeout)),
                };
                (position, matcher.resolve(&request).await)
            });
            positions.insert(handle.id(), position);
        }

        let deadline = Instant::now() + self.timeout;

        loop {
            let joined = tokio::time::timeout_at(deadline, tasks.join_next()).await;
            match joined {
                Ok(Some(Ok((position, outcome)))) => {
                    slots[position] = Some(outcome);
                }
                Ok(Some(Err(join_err))) => {
                    // A panicked item must not take the batch down; its
                    // slot becomes a per-item internal failure.
                    tracing::error!("Batch item task failed: {}", join_err);
                    if let Some(&position) = positions.get(&join_err.id()) {
                        slots[position] =
                            Some(Err(MatchError::Internal(join_err.to_string())));
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        "Batch timed out after {:?}, aborting unfinished items",
                        self.timeout
                    );
                    tasks.abort_all();
                    break;
                }
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or(Err(MatchError::Timeout)))
            .collect()
    }
}
