use std::cmp::min;
use std::time::Duration;

use rand::Rng;

/// Delay strategy between failed upload attempts: either a plain fixed sleep
/// or an exponential schedule capped at a maximum, with an optional
/// sub-second random jitter.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryPolicy {
    Fixed {
        delay: Duration,
    },
    ExponentialBackoff {
        base_delay: Duration,
        max_delay: Duration,
        exponential_base: f64,
        jitter: bool,
    },
}

impl RetryPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self::Fixed { delay }
    }

    /// Delay to wait after failed attempt `attempt` (1-based) before the next
    /// one. The jitter term, when enabled, adds up to one extra second on top
    /// of the capped exponential delay.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => *delay,
            Self::ExponentialBackoff {
                base_delay,
                max_delay,
                exponential_base,
                jitter,
            } => {
                let delay_ms = base_delay.as_millis() as f64
                    * exponential_base.powi(attempt.saturating_sub(1) as i32);
                let mut delay = min(Duration::from_millis(delay_ms as u64), *max_delay);

                if *jitter {
                    delay += Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..1.0));
                }

                delay
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::ExponentialBackoff {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(60),
            exponential_base: 2.0,
            jitter: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub policy: RetryPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            policy: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backoff(jitter: bool) -> RetryPolicy {
        RetryPolicy::ExponentialBackoff {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(4),
            exponential_base: 2.0,
            jitter,
        }
    }

    #[test]
    fn test_fixed_delay_is_constant() {
        let policy = RetryPolicy::fixed(Duration::from_secs(1));
        for attempt in 1..=5 {
            assert_eq!(policy.delay_for_attempt(attempt), Duration::from_secs(1));
        }
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = backoff(false);
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_capped_at_max_delay() {
        let policy = backoff(false);
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(4));
    }

    #[test]
    fn test_jitter_adds_less_than_one_second() {
        let policy = backoff(true);
        for _ in 0..50 {
            let delay = policy.delay_for_attempt(2);
            assert!(delay >= Duration::from_secs(2));
            assert!(delay < Duration::from_secs(3));
        }
    }

    #[test]
    fn test_default_config_attempts() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert!(matches!(
            config.policy,
            RetryPolicy::ExponentialBackoff { jitter: true, .. }
        ));
    }
}
