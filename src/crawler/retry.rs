//! Whole-run retry envelope
//!
//! A failed attempt is not resumed: the next attempt starts the task from the
//! top, relying on idempotent catalog writes.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Runs `f` up to `attempts` times with a fixed `delay` between attempts
///
/// `on_retry` is called once per failed attempt that is followed by another
/// one. The last error is returned when every attempt fails.
///
/// # Arguments
///
/// * `attempts` - Total number of attempts (at least one is made)
/// * `delay` - Pause between a failure and the next attempt
/// * `on_retry` - Hook receiving the failed attempt number and its error
/// * `f` - The attempt, given its 1-based number
pub async fn retry<T, E, F, Fut, H>(attempts: u32, delay: Duration, mut on_retry: H, mut f: F) -> Result<T, E>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    H: FnMut(u32, &E),
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match f(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < attempts => {
                tracing::warn!("Attempt {} failed, retrying... ({})", attempt, error);
                on_retry(attempt, &error);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                tracing::error!("All retry attempts failed: {}", error);
                return Err(error);
            }
        }
    }
}
