use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses what the simulated dispatcher says and how long it waits before
/// saying it. Injected into the session so tests can script both.
///
/// `Send + Sync` because the session worker holds the selector across await
/// points inside a spawned task.
pub trait ReplySelector: Send + Sync {
    /// Reply text for one scheduled dispatcher turn. `None` skips the turn
    /// (empty pool).
    fn pick_reply(&mut self, pool: &[String]) -> Option<String>;

    /// Delay before the reply fires, within `[min, max]`.
    fn pick_delay(&mut self, min: Duration, max: Duration) -> Duration;
}

/// Production selector: uniform over the pool, uniform over the delay window.
pub struct UniformSelector {
    rng: StdRng,
}

impl UniformSelector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for demos and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplySelector for UniformSelector {
    fn pick_reply(&mut self, pool: &[String]) -> Option<String> {
        if pool.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..pool.len());
        Some(pool[index].clone())
    }

    fn pick_delay(&mut self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        let span_ms = (max - min).as_millis() as u64;
        min + Duration::from_millis(self.rng.random_range(0..=span_ms))
    }
}

/// Deterministic selector for tests: round-robins the pool and always waits
/// the same fixed delay.
pub struct ScriptedSelector {
    next: usize,
    delay: Duration,
}

impl ScriptedSelector {
    pub fn new(delay: Duration) -> Self {
        Self { next: 0, delay }
    }
}

impl ReplySelector for ScriptedSelector {
    fn pick_reply(&mut self, pool: &[String]) -> Option<String> {
        if pool.is_empty() {
            return None;
        }
        let reply = pool[self.next % pool.len()].clone();
        self.next += 1;
        Some(reply)
    }

    fn pick_delay(&mut self, _min: Duration, _max: Duration) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn uniform_delay_stays_inside_the_window() {
        let mut selector = UniformSelector::seeded(7);
        let min = Duration::from_millis(2_000);
        let max = Duration::from_millis(5_000);
        for _ in 0..1_000 {
            let delay = selector.pick_delay(min, max);
            assert!(delay >= min && delay <= max, "out of window: {delay:?}");
        }
    }

    #[test]
    fn uniform_reply_covers_the_pool() {
        let mut selector = UniformSelector::seeded(7);
        let pool = pool(&["a", "b", "c"]);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(selector.pick_reply(&pool).unwrap());
        }
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn degenerate_window_returns_min() {
        let mut selector = UniformSelector::seeded(7);
        let exact = Duration::from_millis(500);
        assert_eq!(selector.pick_delay(exact, exact), exact);
    }

    #[test]
    fn scripted_selector_round_robins() {
        let mut selector = ScriptedSelector::new(Duration::from_secs(3));
        let pool = pool(&["first", "second"]);
        assert_eq!(selector.pick_reply(&pool).as_deref(), Some("first"));
        assert_eq!(selector.pick_reply(&pool).as_deref(), Some("second"));
        assert_eq!(selector.pick_reply(&pool).as_deref(), Some("first"));
    }

    #[test]
    fn empty_pool_skips_the_turn() {
        let mut uniform = UniformSelector::seeded(7);
        let mut scripted = ScriptedSelector::new(Duration::ZERO);
        assert!(uniform.pick_reply(&[]).is_none());
        assert!(scripted.pick_reply(&[]).is_none());
    }

    #[test]
    fn selectors_satisfy_the_worker_task_bounds() {
        fn spawnable<T: ReplySelector + Send + Sync + 'static>() {}
        spawnable::<UniformSelector>();
        spawnable::<ScriptedSelector>();
    }
}
