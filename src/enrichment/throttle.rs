//! Concurrency throttling for per-record enrichment tasks.
//!
//! Two tools live here:
//!
//! - [`TaskPool`], a soft-limited in-flight task tracker. Admission is never
//!   blocked; only the caller's decision to move on to the next record is
//!   gated, so observed concurrency can briefly exceed the limit by one
//!   task. That slack is intentional - the external rate limits we respect
//!   are conventions, not hard quotas.
//! - [`rate_limit_pause`], the jittered inter-call delay used between two
//!   attempts for the same record. The jitter spreads request bursts that
//!   would otherwise synchronize against public APIs.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use rand::Rng;

/// Base delay between two provider calls for the same record.
pub const DEFAULT_PROVIDER_DELAY: Duration = Duration::from_millis(1500);

/// Soft-limited set of outstanding enrichment tasks.
///
/// Tasks must resolve to a terminal value; convert failures into values
/// before pushing - nothing here catches panics or unwinds errors.
pub struct TaskPool<T> {
    tasks: FuturesUnordered<BoxFuture<'static, T>>,
}

impl<T> TaskPool<T> {
    pub fn new() -> Self {
        Self {
            tasks: FuturesUnordered::new(),
        }
    }

    /// Number of outstanding tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Admit a task. Never blocks.
    pub fn push(&mut self, task: impl Future<Output = T> + Send + 'static) {
        self.tasks.push(Box::pin(task));
    }

    /// Soft gate: await the fastest outstanding task only once the pool has
    /// reached `limit`; otherwise return `None` immediately, meaning "no
    /// need to wait yet".
    pub async fn wait(&mut self, limit: usize) -> Option<T> {
        if self.tasks.len() < limit {
            return None;
        }
        self.tasks.next().await
    }

    /// Drain every remaining task, in completion order.
    pub async fn drain(&mut self) -> Vec<T> {
        let mut done = Vec::with_capacity(self.tasks.len());
        while let Some(result) = self.tasks.next().await {
            done.push(result);
        }
        done
    }
}

impl<T> Default for TaskPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleep for a randomized delay drawn uniformly from
/// `[base * 0.8, base * 1.2]`.
pub async fn rate_limit_pause(base: Duration) {
    let factor: f64 = rand::rng().random_range(0.8..=1.2);
    tokio::time::sleep(base.mul_f64(factor)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_wait_returns_immediately_below_limit() {
        let mut pool: TaskPool<u32> = TaskPool::new();
        pool.push(async { 1 });
        pool.push(async { 2 });

        // Two outstanding, limit five: the gate must not block
        assert_eq!(pool.wait(5).await, None);
        assert_eq!(pool.len(), 2);
    }

    #[tokio::test]
    async fn test_wait_blocks_at_limit() {
        let mut pool: TaskPool<u32> = TaskPool::new();
        for i in 0..3 {
            pool.push(async move { i });
        }

        let done = pool.wait(3).await;
        assert!(done.is_some());
        assert_eq!(pool.len(), 2);
    }

    #[tokio::test]
    async fn test_drain_returns_all_results() {
        let mut pool: TaskPool<u32> = TaskPool::new();
        for i in 0..10 {
            pool.push(async move { i });
        }

        let mut results = pool.drain().await;
        results.sort_unstable();
        assert_eq!(results, (0..10).collect::<Vec<_>>());
        assert!(pool.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_observed_concurrency_stays_near_limit() {
        const LIMIT: usize = 4;

        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut pool: TaskPool<()> = TaskPool::new();
        for _ in 0..20 {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            pool.push(async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                current.fetch_sub(1, Ordering::SeqCst);
            });
            let _ = pool.wait(LIMIT).await;
        }
        pool.drain().await;

        // The gate is soft: one task of transient over-admission is fine,
        // sustained bursts above that are not.
        assert!(peak.load(Ordering::SeqCst) <= LIMIT + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_pause_jitter_bounds() {
        let base = Duration::from_millis(1500);
        for _ in 0..8 {
            let started = tokio::time::Instant::now();
            rate_limit_pause(base).await;
            let slept = started.elapsed();
            assert!(slept >= base.mul_f64(0.8), "slept only {slept:?}");
            assert!(slept <= base.mul_f64(1.2) + Duration::from_millis(1));
        }
    }
}
