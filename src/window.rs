// SPDX-License-Identifier: Apache-2.0

//! The BDP estimate and window policy (§4.5): produces the new `cwnd` on an
//! increase opportunity, and the new `ssthresh`/`cwnd` on a congestion
//! event.

use crate::{config::Config, fusion::Verdict};
use core::time::Duration;

/// Estimates the bandwidth-delay product in bytes (§4.5).
///
/// Falls back to `cwnd` when neither RTT is known, and otherwise uses
/// whichever RTT is available as `min_rtt_effective`.
#[inline]
pub fn estimate_bdp(
    peak_throughput: f64,
    cwnd: u32,
    min_rtt: Option<Duration>,
    last_rtt: Option<Duration>,
) -> f64 {
    let min_rtt_effective = match (min_rtt, last_rtt) {
        (Some(min_rtt), _) if min_rtt > Duration::ZERO => Some(min_rtt),
        (_, Some(last_rtt)) if last_rtt > Duration::ZERO => Some(last_rtt),
        _ => None,
    };

    let Some(min_rtt_effective) = min_rtt_effective else {
        return cwnd as f64;
    };

    // §4.5: "cwnd / max(min_rtt, last_rtt)" — use whichever RTT sample is
    // larger, falling back to the only one known if just one is available.
    let positive_min_rtt = min_rtt.filter(|rtt| *rtt > Duration::ZERO);
    let positive_last_rtt = last_rtt.filter(|rtt| *rtt > Duration::ZERO);
    let rate_denominator = match (positive_min_rtt, positive_last_rtt) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    };
    let rate_based = match rate_denominator {
        Some(denom) if denom > Duration::ZERO => cwnd as f64 / denom.as_secs_f64(),
        _ => 0.0,
    };

    peak_throughput.max(rate_based) * min_rtt_effective.as_secs_f64()
}

/// Safety clamp shared by both paths (§3.2 invariants, §4.5).
#[inline]
fn clamp_cwnd(cwnd: f64, segment_size: u32, bdp: f64, config: &Config) -> u32 {
    let min_cwnd = (config.min_cwnd_segments * segment_size) as f64;
    let max_cwnd = (8.0 * bdp).max((config.cwnd_cap_segments * segment_size) as f64);
    cwnd.clamp(min_cwnd, max_cwnd) as u32
}

/// The increase path (§4.5): called from `increase_window` when the host
/// has not called `get_ssthresh`.
///
/// Returns the new `cwnd` and the updated `consecutive_growth` counter.
#[inline]
pub fn on_increase(
    cwnd: u32,
    ssthresh: u32,
    segment_size: u32,
    segments_acked: u32,
    bdp: f64,
    alpha: f32,
    consecutive_growth: u32,
    config: &Config,
) -> (u32, u32) {
    let segment_size_f = segment_size as f64;
    let target_cwnd = if cwnd < ssthresh {
        // Slow start.
        let factor = if consecutive_growth >= 3 { 3.0 } else { 2.0 };
        let target = 3.0 * bdp;
        let grown = cwnd as f64 + factor * segments_acked as f64 * segment_size_f;
        target.min(grown)
    } else {
        // Congestion avoidance.
        let gamma = segments_acked.max(1) as f64;
        (alpha as f64 * bdp).floor().max(cwnd as f64) + gamma * segment_size_f
    };

    let new_cwnd = clamp_cwnd(target_cwnd, segment_size, bdp, config);
    (new_cwnd, consecutive_growth + 1)
}

/// The congestion-event path (§4.5): called from `get_ssthresh`.
///
/// Returns the new `ssthresh` (also used as the new `cwnd`, per §4.5: "Set
/// cwnd = new_ssthresh").
#[inline]
pub fn on_congestion_event(
    verdict: Verdict,
    cwnd: u32,
    bytes_in_flight: u32,
    segment_size: u32,
    config: &Config,
) -> u32 {
    let lambda = match verdict {
        Verdict::Loss => config.retention_loss,
        Verdict::EcnBurst => config.retention_ecn,
        Verdict::Timeout => config.retention_timeout,
        Verdict::Benign => config.retention_default,
    };

    let basis = cwnd.max(bytes_in_flight);
    let basis_segments = basis as f64 / segment_size as f64;

    // Retention factors are configured as `f32` (e.g. `0.70`) and cannot be
    // represented exactly; widening to `f64` and multiplying by a raw byte
    // count can land a hair under the intended value (0.70 * 80 segments
    // landing on 55.999999... instead of 56). Apply the factor to the
    // segment count rather than raw bytes, and nudge by an epsilon scaled to
    // the magnitude of the product (comfortably above the ~1.2e-7 relative
    // error `f32` widening introduces, comfortably below one segment) before
    // flooring, so the worked examples land on the exact segment count.
    let epsilon = (basis_segments * 1e-6).max(1e-9);
    let retained_segments = (lambda as f64 * basis_segments + epsilon).floor();
    let retained_bytes = (retained_segments * segment_size as f64) as u32;

    retained_bytes.max(2 * segment_size)
}
