//! Ordered fallback combinators.
//!
//! A cascade is a list of alternatives tried strictly in declared order. The
//! first alternative that produces a value wins; nothing is scored or ranked.

use std::time::Duration;
use tokio::time::Instant;

/// The value produced by a cascade together with the position that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit<T> {
    /// Zero-based index of the winning step.
    pub index: usize,
    /// Value produced by that step.
    pub value: T,
}

/// Runs `attempt` on each step in order until one yields a value.
///
/// An error from any step stops the cascade and is returned as-is.
pub fn first_success<S, T, E>(
    steps: &[S],
    mut attempt: impl FnMut(&S) -> Result<Option<T>, E>,
) -> Result<Option<Hit<T>>, E> {
    for (index, step) in steps.iter().enumerate() {
        if let Some(value) = attempt(step)? {
            return Ok(Some(Hit { index, value }));
        }
    }
    Ok(None)
}

/// Infallible form of [`first_success`].
pub fn first_match<S, T>(steps: &[S], mut attempt: impl FnMut(&S) -> Option<T>) -> Option<Hit<T>> {
    steps
        .iter()
        .enumerate()
        .find_map(|(index, step)| attempt(step).map(|value| Hit { index, value }))
}

/// Calls `probe` until it yields a value or `timeout` elapses.
///
/// The probe always runs at least once. Waits between probes are clipped to
/// the deadline, so the call never outlives `timeout` by more than one probe.
pub async fn poll_until<T, E>(
    timeout: Duration,
    interval: Duration,
    mut probe: impl FnMut() -> Result<Option<T>, E>,
) -> Result<Option<T>, E> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(value) = probe()? {
            return Ok(Some(value));
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }

        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_takes_earliest() {
        let steps = [1, 2, 3, 4];
        let hit = first_match(&steps, |n| (n % 2 == 0).then_some(n * 10)).unwrap();
        assert_eq!(hit, Hit { index: 1, value: 20 });
    }

    #[test]
    fn test_first_match_none() {
        let steps = ["a", "b"];
        assert!(first_match(&steps, |_| None::<()>).is_none());
    }

    #[test]
    fn test_first_success_stops_on_error() {
        let steps = [1, 2, 3];
        let mut seen = Vec::new();
        let result: Result<Option<Hit<i32>>, String> = first_success(&steps, |n| {
            seen.push(*n);
            if *n == 2 {
                Err("boom".to_string())
            } else {
                Ok(None)
            }
        });

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_first_success_value() {
        let steps = ["", "x", "y"];
        let hit: Option<Hit<String>> =
            first_success::<_, _, ()>(&steps, |s| Ok((!s.is_empty()).then(|| s.to_uppercase())))
                .unwrap();
        assert_eq!(hit, Some(Hit { index: 1, value: "X".to_string() }));
    }

    #[tokio::test]
    async fn test_poll_until_immediate() {
        let result: Result<Option<u8>, ()> =
            poll_until(Duration::from_secs(5), Duration::from_millis(10), || Ok(Some(7))).await;
        assert_eq!(result, Ok(Some(7)));
    }

    #[tokio::test]
    async fn test_poll_until_succeeds_after_retries() {
        let mut calls = 0;
        let result: Result<Option<u32>, ()> =
            poll_until(Duration::from_secs(5), Duration::from_millis(1), || {
                calls += 1;
                Ok((calls == 3).then_some(calls))
            })
            .await;
        assert_eq!(result, Ok(Some(3)));
    }

    #[tokio::test]
    async fn test_poll_until_times_out() {
        let started = std::time::Instant::now();
        let result: Result<Option<()>, ()> =
            poll_until(Duration::from_millis(40), Duration::from_millis(5), || Ok(None)).await;
        assert_eq!(result, Ok(None));
        assert!(started.elapsed() >= Duration::from_millis(40));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_poll_until_zero_timeout_probes_once() {
        let mut calls = 0;
        let _: Result<Option<()>, ()> = poll_until(Duration::ZERO, Duration::from_millis(5), || {
            calls += 1;
            Ok(None)
        })
        .await;
        assert_eq!(calls, 1);
    }
}
