use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Default number of per-horse sub-pipelines allowed in flight
pub const DEFAULT_MAX_CONCURRENT: usize = 15;

/// Concurrency gate for per-horse history fetches
///
/// Callers acquire a token before starting work and release it when done.
/// Tokens cannot be cloned, so availability never rises above capacity, and a
/// token that is dropped without an explicit release is still returned.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Proof of one acquired slot
#[derive(Debug)]
pub struct LimiterToken {
    _permit: OwnedSemaphorePermit,
}

impl RateLimiter {
    /// Create a limiter with the given capacity (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait until a slot is free and take it
    pub async fn acquire(&self) -> LimiterToken {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("rate limiter semaphore is never closed");
        LimiterToken { _permit: permit }
    }

    /// Return a slot to the pool
    pub fn release(&self, token: LimiterToken) {
        drop(token);
    }

    /// Slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_default_capacity() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.capacity(), 15);
        assert_eq!(limiter.available(), 15);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(RateLimiter::new(0).capacity(), 1);
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let limiter = RateLimiter::new(2);

        let first = limiter.acquire().await;
        let second = limiter.acquire().await;
        assert_eq!(limiter.available(), 0);

        limiter.release(first);
        assert_eq!(limiter.available(), 1);

        drop(second);
        assert_eq!(limiter.available(), 2);
    }

    #[tokio::test]
    async fn test_acquire_waits_when_exhausted() {
        let limiter = RateLimiter::new(1);
        let held = limiter.acquire().await;

        let mut waiting = task::spawn(limiter.acquire());
        assert_pending!(waiting.poll());

        limiter.release(held);
        assert!(waiting.is_woken());
        let token = assert_ready!(waiting.poll());

        limiter.release(token);
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test]
    async fn test_availability_never_exceeds_capacity() {
        let limiter = RateLimiter::new(3);
        for _ in 0..10 {
            let token = limiter.acquire().await;
            limiter.release(token);
            assert!(limiter.available() <= limiter.capacity());
        }
        assert_eq!(limiter.available(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_cap_under_load() {
        let limiter = RateLimiter::new(DEFAULT_MAX_CONCURRENT);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..60)
            .map(|_| {
                let limiter = limiter.clone();
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    let token = limiter.acquire().await;
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    limiter.release(token);
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= DEFAULT_MAX_CONCURRENT);
        assert_eq!(limiter.available(), DEFAULT_MAX_CONCURRENT);
    }
}
