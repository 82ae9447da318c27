// SPDX-License-Identifier: Apache-2.0

//! Per-flow metrics tracked by Lark beyond what the host already exposes
//! (§4.2, §3.2).

use crate::{config::Config, time::Timestamp};
use core::time::Duration;
use std::collections::VecDeque;

/// Tracks ECN CE timestamps, RTT mirror, cumulative bytes, and throughput
/// for one connection.
///
/// `ecn_events` is a bounded ring (backed by a `VecDeque`, pruned lazily on
/// read) sized for a 1s window at the configured `ecn_rate_high` — see
/// `MetricsTracker::prune_ecn_events`. This matches §3.2's "capacity
/// sufficient for a 1s window" and §8's invariant that the ring never grows
/// past `ecn_rate_high * ecn_window + small_margin`.
#[derive(Clone, Debug)]
pub struct MetricsTracker {
    last_rtt: Option<Duration>,
    min_rtt: Option<Duration>,
    total_bytes_acked: u64,
    peak_throughput: f64,
    connection_start: Option<Timestamp>,
    ecn_events: VecDeque<Timestamp>,
    ecn_recent: bool,
}

/// Safety margin above `ecn_rate_high * ecn_window` the ring is allowed to
/// grow to before the next prune, to absorb bursts that arrive faster than
/// they're read (§8: "ecn_events length never exceeds
/// ecn_rate_high * ecn_window_s + small_margin").
const ECN_RING_MARGIN: usize = 16;

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            last_rtt: None,
            min_rtt: None,
            total_bytes_acked: 0,
            peak_throughput: 0.0,
            connection_start: None,
            ecn_events: VecDeque::new(),
            ecn_recent: false,
        }
    }

    pub fn last_rtt(&self) -> Option<Duration> {
        self.last_rtt
    }

    pub fn min_rtt(&self) -> Option<Duration> {
        self.min_rtt
    }

    pub fn total_bytes_acked(&self) -> u64 {
        self.total_bytes_acked
    }

    pub fn peak_throughput(&self) -> f64 {
        self.peak_throughput
    }

    pub fn ecn_recent(&self) -> bool {
        self.ecn_recent
    }

    /// Number of CE marks observed within the last `ecn_window` (§4.3 rule
    /// 2, §4.4 ECN feedback term).
    pub fn ecn_events_in_window(&mut self, now: Timestamp, config: &Config) -> usize {
        self.prune_ecn_events(now, config);
        self.ecn_events.len()
    }

    /// Handles `PktsAcked(tcb, n, rtt)` (§4.2): records the latest RTT,
    /// mirrors the host's min RTT, accumulates delivered bytes, and updates
    /// peak throughput.
    ///
    /// `host_min_rtt` mirrors `min_rtt` from the host's sentinel-aware
    /// value (§3.2: "Mirror of host min RTT, clamped to positive"); `None`
    /// is treated as not-yet-measured.
    pub fn on_pkts_acked(
        &mut self,
        segments_acked: u32,
        segment_size: u32,
        rtt: Option<Duration>,
        host_min_rtt: Option<Duration>,
        now: Timestamp,
    ) {
        if let Some(rtt) = rtt {
            if rtt > Duration::ZERO {
                self.last_rtt = Some(rtt);
            }
        }

        self.min_rtt = match host_min_rtt {
            Some(rtt) if rtt > Duration::ZERO => Some(rtt),
            _ => self.min_rtt,
        };

        let delivered = u64::from(segments_acked) * u64::from(segment_size);
        self.total_bytes_acked = self.total_bytes_acked.saturating_add(delivered);

        if self.connection_start.is_none() {
            // §9 Design Notes: "connection start" is the time of the first
            // `PktsAcked`, since the source leaves this undefined.
            self.connection_start = Some(now);
        }

        self.update_peak_throughput(now);
    }

    fn update_peak_throughput(&mut self, now: Timestamp) {
        let Some(start) = self.connection_start else {
            return;
        };
        let elapsed = now.saturating_duration_since(start);
        if elapsed.is_zero() {
            return;
        }
        let throughput = self.total_bytes_acked as f64 / elapsed.as_secs_f64();
        if throughput > self.peak_throughput {
            self.peak_throughput = throughput;
        }
    }

    /// Handles `CwndEvent(EcnIsCe)`: appends `now` to the ring and flags
    /// `ecn_recent`. Handles `CwndEvent(EcnNoCe)`: clears `ecn_recent`
    /// (§4.2).
    pub fn on_ecn_is_ce(&mut self, now: Timestamp, config: &Config) {
        self.ecn_events.push_back(now);
        self.ecn_recent = true;
        self.prune_ecn_events(now, config);
    }

    pub fn on_ecn_no_ce(&mut self) {
        self.ecn_recent = false;
    }

    /// Prunes ring entries older than `config.ecn_window` relative to `now`
    /// (§4.2: "Prune ecn_events older than 1s lazily on next read").
    fn prune_ecn_events(&mut self, now: Timestamp, config: &Config) {
        while let Some(&oldest) = self.ecn_events.front() {
            if now.saturating_duration_since(oldest) > config.ecn_window {
                self.ecn_events.pop_front();
            } else {
                break;
            }
        }
        // Backstop against a host delivering CE marks faster than they're
        // read between prunes; keeps the ring provably bounded per §8.
        let cap = (config.ecn_rate_high as f64 * config.ecn_window.as_secs_f64()) as usize
            + ECN_RING_MARGIN;
        while self.ecn_events.len() > cap {
            self.ecn_events.pop_front();
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
