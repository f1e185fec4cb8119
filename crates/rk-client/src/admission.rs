//! Admission control for outbound requests.
//!
//! All clients in a process share one in-flight counter by default. A request
//! is admitted only while the counter is below the client's ceiling; otherwise
//! it waits for the next delay of its [`DeferralSchedule`] and tries again.
//! Deferral is unbounded.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::debug;

static GLOBAL: LazyLock<Arc<InFlightCounter>> = LazyLock::new(|| Arc::new(InFlightCounter::new()));

/// Count of requests with an outstanding transport call.
#[derive(Debug, Default)]
pub struct InFlightCounter {
    count: AtomicUsize,
}

impl InFlightCounter {
    /// Create a counter starting at zero.
    pub const fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }

    /// The process-wide counter shared by every client that was not given
    /// its own.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Current number of admitted, unfinished requests.
    pub fn in_flight(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Take a slot if fewer than `ceiling` requests are in flight.
    ///
    /// The comparison and the increment are one compare-and-swap, so the
    /// ceiling holds when several tasks race for the last slot.
    pub fn try_acquire(self: &Arc<Self>, ceiling: usize) -> Option<InFlightPermit> {
        self.count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (current < ceiling).then_some(current + 1)
            })
            .ok()
            .map(|_| InFlightPermit {
                counter: Arc::clone(self),
            })
    }

    /// Wait until a slot is free under `ceiling`, sleeping between attempts.
    pub async fn acquire(self: &Arc<Self>, ceiling: usize, config: &AdmissionConfig) -> InFlightPermit {
        let mut schedule = DeferralSchedule::new(config.clone());
        loop {
            if let Some(permit) = self.try_acquire(ceiling) {
                if schedule.deferrals() > 0 {
                    debug!(deferrals = schedule.deferrals(), "Request admitted after deferral");
                }
                return permit;
            }

            let delay = schedule.next_delay();
            debug!(
                in_flight = self.in_flight(),
                ceiling,
                attempt = schedule.deferrals(),
                delay_ms = delay.as_millis(),
                "Concurrency ceiling reached, deferring request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn release(&self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One admitted request. Dropping the permit frees its slot.
#[derive(Debug)]
#[must_use = "dropping the permit releases the slot immediately"]
pub struct InFlightPermit {
    counter: Arc<InFlightCounter>,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.counter.release();
    }
}

/// Configuration for waiting on a full ceiling.
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Delay before the first re-check.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// How delays grow between re-checks.
    pub backoff: BackoffStrategy,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(300),
            max_delay: Duration::from_secs(5),
            backoff: BackoffStrategy::Constant,
        }
    }
}

impl AdmissionConfig {
    /// Use the given delay before the first re-check.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Cap every delay at `delay`.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Use the given backoff strategy.
    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Exponential backoff with jitter, for clients sharing a busy process.
    pub fn exponential() -> Self {
        Self {
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
            backoff: BackoffStrategy::ExponentialWithJitter { factor: 2.0 },
        }
    }
}

/// Backoff strategy for deferral delays.
#[derive(Debug, Clone, Copy)]
pub enum BackoffStrategy {
    /// Same delay every time.
    Constant,
    /// delay * (attempt + 1).
    Linear,
    /// delay * factor^attempt.
    Exponential { factor: f64 },
    /// Exponential plus a random share of itself, to spread out re-checks.
    ExponentialWithJitter { factor: f64 },
}

impl BackoffStrategy {
    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay(&self, attempt: u32, initial_delay: Duration, max_delay: Duration) -> Duration {
        let delay = match self {
            BackoffStrategy::Constant => initial_delay,
            BackoffStrategy::Linear => initial_delay.saturating_mul(attempt.saturating_add(1)),
            BackoffStrategy::Exponential { factor } => {
                scaled(initial_delay, factor.powi(attempt.min(64) as i32), max_delay)
            }
            BackoffStrategy::ExponentialWithJitter { factor } => {
                let base = scaled(initial_delay, factor.powi(attempt.min(64) as i32), max_delay);
                let jitter = rand::rng().random::<f64>();
                scaled(base, 1.0 + jitter, max_delay)
            }
        };

        std::cmp::min(delay, max_delay)
    }
}

fn scaled(delay: Duration, multiplier: f64, cap: Duration) -> Duration {
    let secs = delay.as_secs_f64() * multiplier;
    if secs.is_finite() && secs < cap.as_secs_f64() {
        Duration::from_secs_f64(secs)
    } else {
        cap
    }
}

/// Per-request sequence of deferral delays.
#[derive(Debug, Clone)]
pub struct DeferralSchedule {
    config: AdmissionConfig,
    deferrals: u32,
}

impl DeferralSchedule {
    /// Start a schedule with no deferrals recorded.
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            config,
            deferrals: 0,
        }
    }

    /// Number of times the request has been deferred so far.
    pub fn deferrals(&self) -> u32 {
        self.deferrals
    }

    /// Record a deferral and return how long to wait before re-checking.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.config.backoff.delay(
            self.deferrals,
            self.config.initial_delay,
            self.config.max_delay,
        );
        self.deferrals = self.deferrals.saturating_add(1);
        delay
    }
}
