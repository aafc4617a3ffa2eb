use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Moving-average rates are advanced in steps of this length.
const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Exponentially weighted moving average of a per-second rate.
#[derive(Debug)]
struct Ewma {
    alpha: f64,
    rate: f64,
    initialized: bool,
}

impl Ewma {
    // ---
    fn over_minutes(minutes: f64) -> Self {
        // ---
        let alpha = 1.0 - (-TICK_INTERVAL.as_secs_f64() / 60.0 / minutes).exp();
        Self {
            alpha,
            rate: 0.0,
            initialized: false,
        }
    }

    fn tick(&mut self, count: u64) {
        // ---
        let instant_rate = count as f64 / TICK_INTERVAL.as_secs_f64();
        if self.initialized {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.initialized = true;
        }
    }
}

#[derive(Debug)]
struct MovingRates {
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
}

/// Per-second rates averaged over the last 1, 5 and 15 minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterRates {
    pub one_minute: f64,
    pub five_minute: f64,
    pub fifteen_minute: f64,
}

/// Monotonic event counter with mean and moving-average rates.
///
/// Safe to mark from any number of threads at once; counts are never lost.
/// Moving averages are advanced lazily, on `mark` and on reads, one step
/// per elapsed five-second tick.
#[derive(Debug)]
pub struct Meter {
    // ---
    count: AtomicU64,
    uncounted: AtomicU64,
    started: Instant,
    /// Nanoseconds after `started` of the last applied tick.
    last_tick: AtomicU64,
    rates: Mutex<MovingRates>,
}

impl Meter {
    // ---
    pub fn new() -> Self {
        // ---
        Self {
            count: AtomicU64::new(0),
            uncounted: AtomicU64::new(0),
            started: Instant::now(),
            last_tick: AtomicU64::new(0),
            rates: Mutex::new(MovingRates {
                m1: Ewma::over_minutes(1.0),
                m5: Ewma::over_minutes(5.0),
                m15: Ewma::over_minutes(15.0),
            }),
        }
    }

    /// Record `n` events.
    pub fn mark(&self, n: u64) {
        // ---
        self.mark_at(n, Instant::now());
    }

    fn mark_at(&self, n: u64, now: Instant) {
        // ---
        self.tick_if_necessary(now);
        self.count.fetch_add(n, Ordering::Relaxed);
        self.uncounted.fetch_add(n, Ordering::Relaxed);
    }

    /// Total events recorded so far.
    pub fn count(&self) -> u64 {
        // ---
        self.count.load(Ordering::Relaxed)
    }

    /// Time elapsed since the meter was created.
    pub fn elapsed(&self) -> Duration {
        // ---
        self.started.elapsed()
    }

    /// Average events per second since creation.
    pub fn mean_rate(&self) -> f64 {
        // ---
        self.mean_rate_at(Instant::now())
    }

    fn mean_rate_at(&self, now: Instant) -> f64 {
        // ---
        let secs = now.saturating_duration_since(self.started).as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.count() as f64 / secs
    }

    /// Current 1, 5 and 15 minute moving-average rates, in events per second.
    pub fn rates(&self) -> MeterRates {
        // ---
        self.rates_at(Instant::now())
    }

    pub fn one_minute_rate(&self) -> f64 {
        self.rates().one_minute
    }

    pub fn five_minute_rate(&self) -> f64 {
        self.rates().five_minute
    }

    pub fn fifteen_minute_rate(&self) -> f64 {
        self.rates().fifteen_minute
    }

    fn rates_at(&self, now: Instant) -> MeterRates {
        // ---
        self.tick_if_necessary(now);
        let rates = self.rates.lock().unwrap_or_else(PoisonError::into_inner);
        MeterRates {
            one_minute: rates.m1.rate,
            five_minute: rates.m5.rate,
            fifteen_minute: rates.m15.rate,
        }
    }

    fn tick_if_necessary(&self, now: Instant) {
        // ---
        let tick_nanos = TICK_INTERVAL.as_nanos() as u64;
        let old_tick = self.last_tick.load(Ordering::Acquire);
        let now_nanos = now.saturating_duration_since(self.started).as_nanos() as u64;
        let age = now_nanos.saturating_sub(old_tick);
        if age <= tick_nanos {
            return;
        }

        let new_tick = now_nanos - age % tick_nanos;
        // Only the caller that moves the tick forward applies the steps.
        if self
            .last_tick
            .compare_exchange(old_tick, new_tick, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let required_ticks = age / tick_nanos;
        let mut rates = self.rates.lock().unwrap_or_else(PoisonError::into_inner);
        for _ in 0..required_ticks {
            let count = self.uncounted.swap(0, Ordering::AcqRel);
            rates.m1.tick(count);
            rates.m5.tick(count);
            rates.m15.tick(count);
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a meter, handed out to benchmark harnesses.
pub type MeterPtr = Arc<Meter>;

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::thread;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn mark_accumulates() {
        // ---
        let meter = Meter::new();
        meter.mark(0);
        assert_eq!(meter.count(), 0);

        meter.mark(3);
        meter.mark(4);
        assert_eq!(meter.count(), 7);
        assert!(meter.mean_rate() >= 0.0);
    }

    #[test]
    fn concurrent_marks_are_not_lost() {
        // ---
        let meter = Arc::new(Meter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let meter = Arc::clone(&meter);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        meter.mark(1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(meter.count(), 8000);
    }

    #[test]
    fn rates_are_zero_before_the_first_tick() {
        // ---
        let meter = Meter::new();
        meter.mark_at(500, meter.started + secs(1));

        let rates = meter.rates_at(meter.started + secs(2));
        assert_eq!(rates.one_minute, 0.0);
        assert_eq!(rates.fifteen_minute, 0.0);
    }

    #[test]
    fn first_tick_sets_every_rate() {
        // ---
        let meter = Meter::new();
        meter.mark_at(500, meter.started + secs(1));

        let rates = meter.rates_at(meter.started + secs(6));
        assert!((rates.one_minute - 100.0).abs() < 1e-9, "{rates:?}");
        assert!((rates.five_minute - 100.0).abs() < 1e-9, "{rates:?}");
        assert!((rates.fifteen_minute - 100.0).abs() < 1e-9, "{rates:?}");
    }

    #[test]
    fn recent_rate_is_not_diluted_by_idle_time() {
        // ---
        let meter = Meter::new();
        let t0 = meter.started;

        // Ten idle minutes, then five minutes at 1000 events/s.
        let idle = meter.rates_at(t0 + secs(600));
        assert_eq!(idle.one_minute, 0.0);

        for k in 1..=60 {
            meter.mark_at(5000, t0 + secs(600 + 5 * k - 1));
        }
        let end = t0 + secs(901);
        let rates = meter.rates_at(end);
        let mean = meter.mean_rate_at(end);

        assert_eq!(meter.count(), 300_000);
        assert!(rates.one_minute > 990.0 && rates.one_minute <= 1000.0, "{rates:?}");
        assert!(rates.five_minute > rates.fifteen_minute, "{rates:?}");
        assert!(mean < 400.0, "mean {mean}");
        assert!(rates.one_minute > 2.0 * mean);
    }

    #[test]
    fn rates_decay_when_marks_stop() {
        // ---
        let meter = Meter::new();
        let t0 = meter.started;
        for k in 1..=12 {
            meter.mark_at(5000, t0 + secs(5 * k - 1));
        }
        let busy = meter.rates_at(t0 + secs(61));
        let quiet = meter.rates_at(t0 + secs(361));

        assert!(quiet.one_minute < busy.one_minute / 100.0, "{busy:?} {quiet:?}");
        assert!(quiet.fifteen_minute < busy.fifteen_minute);
    }
}
