//! Count-to-rate conversion applied at flush time.

/// Convert a delta sum accumulated since `prev_ms` into a rate expressed in
/// the time unit whose length is `unit_ms`.
///
/// A non-positive elapsed window yields `0.0`; that guards against clock
/// anomalies and two flushes issued at the identical timestamp. The caller
/// owns the accumulator; this function never mutates state.
pub fn rate_of(sum: f64, now_ms: i64, prev_ms: i64, unit_ms: i64) -> f64 {
    let elapsed = now_ms - prev_ms;
    if elapsed <= 0 {
        return 0.0;
    }
    (sum / elapsed as f64) * unit_ms as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_per_second_over_two_second_window() {
        // 3 + 2 events over 2000ms -> 2.5/s
        assert_eq!(rate_of(5.0, 12_000, 10_000, 1_000), 2.5);
    }

    #[test]
    fn rescales_to_configured_unit() {
        // 5 events over 2000ms -> 150/min
        assert_eq!(rate_of(5.0, 2_000, 0, 60_000), 150.0);
    }

    #[test]
    fn zero_elapsed_yields_zero() {
        assert_eq!(rate_of(42.0, 10_000, 10_000, 1_000), 0.0);
    }

    #[test]
    fn clock_going_backwards_yields_zero() {
        assert_eq!(rate_of(42.0, 9_000, 10_000, 1_000), 0.0);
    }

    #[test]
    fn empty_window_sum_yields_zero_rate() {
        assert_eq!(rate_of(0.0, 5_000, 0, 1_000), 0.0);
    }
}
