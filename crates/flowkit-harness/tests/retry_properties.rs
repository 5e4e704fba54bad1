use flowkit_harness::{RetryOptions, try_assertion_with_outcome};
use proptest::prelude::*;
use std::time::Duration;
use tokio::time::Instant;

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn eventually_succeeds_within_deadline(
        failures in 0u32..8,
        interval_ms in 1u64..50,
        slack_ms in 0u64..200,
    ) {
        let timeout_ms = (u64::from(failures) + 1) * interval_ms + slack_ms;
        let options = RetryOptions::from_millis(interval_ms, timeout_ms);

        let (outcome, calls) = paused_runtime().block_on(async {
            let start = Instant::now();
            let mut calls = Vec::new();
            let outcome = try_assertion_with_outcome(
                || {
                    calls.push(start.elapsed());
                    if calls.len() as u32 > failures {
                        Ok(calls.len())
                    } else {
                        Err("not yet")
                    }
                },
                options,
            )
            .await;
            (outcome, calls)
        });

        prop_assert_eq!(outcome.result, Ok(failures as usize + 1));
        prop_assert_eq!(outcome.attempts, failures + 1);
        prop_assert!(calls[0] >= options.interval);
        for pair in calls.windows(2) {
            prop_assert!(pair[1] - pair[0] >= options.interval);
        }
    }

    #[test]
    fn always_failing_settles_shortly_after_deadline(
        interval_ms in 1u64..50,
        timeout_ms in 0u64..300,
    ) {
        let options = RetryOptions::from_millis(interval_ms, timeout_ms);
        let outcome = paused_runtime().block_on(async {
            let mut attempts = 0u32;
            try_assertion_with_outcome(
                || {
                    attempts += 1;
                    Err::<(), _>(attempts)
                },
                options,
            )
            .await
        });

        prop_assert!(outcome.elapsed > options.timeout);
        prop_assert!(outcome.elapsed <= options.timeout + options.interval * 2);
        prop_assert!(outcome.timed_out(&options));
        // The error is the one from the attempt that found the deadline passed.
        prop_assert_eq!(outcome.result, Err(outcome.attempts));
    }
}

#[test]
fn default_options() {
    let options = RetryOptions::default();
    assert_eq!(options.interval, Duration::from_millis(20));
    assert_eq!(options.timeout, Duration::from_millis(1000));
}
