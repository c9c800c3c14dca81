//! Bounded retry with exponential backoff for single fetches

use std::time::Duration;

use crate::error::FetchError;

/// How many attempts a fetch gets and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included
    pub attempts: u32,
    /// Backoff base in seconds
    pub delay_base: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_base: 2,
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt `attempt` (0-based): `delay_base^(attempt+1)` seconds.
    ///
    /// With the default base of 2 this gives 2s, 4s, 8s, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.delay_base.saturating_pow(attempt.saturating_add(1)))
    }
}

/// Run `attempt_fn` up to `policy.attempts` times.
///
/// Non-200 responses are logged as warnings, everything else as errors.
/// Sleeps between attempts but not after the last one. Returns `None` once
/// every attempt has failed; errors never escape to the caller.
pub fn retry_fetch<T>(
    label: &str,
    policy: &RetryPolicy,
    attempt_fn: impl FnMut() -> Result<T, FetchError>,
) -> Option<T> {
    retry_with_sleep(label, policy, attempt_fn, std::thread::sleep)
}

fn retry_with_sleep<T>(
    label: &str,
    policy: &RetryPolicy,
    mut attempt_fn: impl FnMut() -> Result<T, FetchError>,
    mut sleep: impl FnMut(Duration),
) -> Option<T> {
    for attempt in 0..policy.attempts {
        match attempt_fn() {
            Ok(v) => return Some(v),
            Err(e) if e.is_status() => {
                log::warn!(
                    "{e} for URL: {label} (attempt {}/{})",
                    attempt + 1,
                    policy.attempts
                );
            }
            Err(e) => {
                log::error!(
                    "Error fetching URL: {label} | {e} (attempt {}/{})",
                    attempt + 1,
                    policy.attempts
                );
            }
        }
        if attempt + 1 < policy.attempts {
            sleep(policy.backoff(attempt));
        }
    }
    log::debug!("{label}: giving up after {} attempts", policy.attempts);
    None
}
