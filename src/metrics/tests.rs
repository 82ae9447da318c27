// SPDX-License-Identifier: Apache-2.0
use super::*;

fn t(secs: u64) -> Timestamp {
    Timestamp::from_duration(Duration::from_secs(secs))
}

#[test]
fn peak_throughput_is_zero_until_first_ack() {
    let metrics = MetricsTracker::new();
    assert_eq!(metrics.peak_throughput(), 0.0);
}

#[test]
fn peak_throughput_tracks_best_rate_and_does_not_decay_within_epoch() {
    let mut metrics = MetricsTracker::new();

    metrics.on_pkts_acked(10, 1000, Some(Duration::from_millis(100)), None, t(0));
    metrics.on_pkts_acked(10, 1000, Some(Duration::from_millis(100)), None, t(1));
    let first_peak = metrics.peak_throughput();
    assert!(first_peak > 0.0);

    // A slower interval should not regress the peak.
    metrics.on_pkts_acked(1, 1000, Some(Duration::from_millis(100)), None, t(10));
    assert_eq!(metrics.peak_throughput(), first_peak);
}

#[test]
fn min_rtt_mirrors_host_and_ignores_sentinel() {
    let mut metrics = MetricsTracker::new();
    metrics.on_pkts_acked(1, 1000, Some(Duration::from_millis(50)), None, t(0));
    assert_eq!(metrics.min_rtt(), None);

    metrics.on_pkts_acked(
        1,
        1000,
        Some(Duration::from_millis(50)),
        Some(Duration::from_millis(20)),
        t(1),
    );
    assert_eq!(metrics.min_rtt(), Some(Duration::from_millis(20)));
}

#[test]
fn ecn_ring_prunes_entries_older_than_window() {
    let mut metrics = MetricsTracker::new();
    let config = Config::default();

    metrics.on_ecn_is_ce(t(0), &config);
    metrics.on_ecn_is_ce(t(0), &config);
    assert_eq!(metrics.ecn_events_in_window(t(0), &config), 2);

    // 2 seconds later, both marks are outside the 1s window.
    assert_eq!(metrics.ecn_events_in_window(t(2), &config), 0);
}

#[test]
fn ecn_recent_flag_tracks_no_ce_transitions() {
    let mut metrics = MetricsTracker::new();
    let config = Config::default();

    assert!(!metrics.ecn_recent());
    metrics.on_ecn_is_ce(t(0), &config);
    assert!(metrics.ecn_recent());
    metrics.on_ecn_no_ce();
    assert!(!metrics.ecn_recent());
}

#[test]
fn ecn_ring_never_exceeds_configured_bound() {
    let mut metrics = MetricsTracker::new();
    let config = Config::default();

    for _ in 0..10_000 {
        metrics.on_ecn_is_ce(t(0), &config);
    }

    let bound = (config.ecn_rate_high as f64 * config.ecn_window.as_secs_f64()) as usize
        + ECN_RING_MARGIN;
    assert!(metrics.ecn_events_in_window(t(0), &config) <= bound);
}
