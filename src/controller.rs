// SPDX-License-Identifier: Apache-2.0

//! `Lark`, the per-connection congestion controller, and the six dispatcher
//! entry points the host transport invokes (§4.6).

use crate::{
    alpha::{self, AlphaInputs},
    config::Config,
    fusion::{self, Verdict},
    metrics::MetricsTracker,
    observation::{CallingContext, Observation},
    tcb::TransportControlBlock,
    time::Timestamp,
    window,
};
use core::sync::atomic::{AtomicU64, Ordering};

/// Process-wide monotonic counter minting fresh `uuid`s (§3.2, §3.3, §9).
///
/// Lives for the process, same as the spec's "lifecycle = process". Relaxed
/// ordering is sufficient: the counter has no other memory to synchronize,
/// it only needs to hand out distinct values.
static NEXT_UUID: AtomicU64 = AtomicU64::new(1);

fn next_uuid() -> u64 {
    NEXT_UUID.fetch_add(1, Ordering::Relaxed)
}

/// A single connection's congestion-control state (§3.2).
///
/// The host transport owns exactly one `Lark` per connection and destroys it
/// at teardown (§3.3); no state is shared across instances except the
/// process-wide `uuid` counter above.
#[derive(Clone, Debug)]
pub struct Lark {
    uuid: u64,
    node_id: u64,
    alpha: f32,
    consecutive_growth: u32,
    last_congestion_time: Option<Timestamp>,
    calling_context: CallingContext,
    metrics: MetricsTracker,
    config: Config,
}

impl Lark {
    /// Creates a new controller for a fresh connection, with
    /// `config.alpha_initial` as the starting `alpha` (§3.2).
    pub fn new(node_id: u64, config: Config) -> Self {
        Self {
            uuid: next_uuid(),
            node_id,
            alpha: config.alpha_initial,
            consecutive_growth: 0,
            last_congestion_time: None,
            calling_context: CallingContext::Increase,
            metrics: MetricsTracker::new(),
            config,
        }
    }

    /// Creates a new controller using `Config::default()`.
    pub fn with_defaults(node_id: u64) -> Self {
        Self::new(node_id, Config::default())
    }

    pub fn uuid(&self) -> u64 {
        self.uuid
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn consecutive_growth(&self) -> u32 {
        self.consecutive_growth
    }

    pub fn last_congestion_time(&self) -> Option<Timestamp> {
        self.last_congestion_time
    }

    /// `name()` (§4.6): the deployment-chosen identifier for this algorithm.
    pub fn name(&self) -> &'static str {
        "Lark"
    }

    /// `fork()` (§4.6, §9 Open Question): creates an independent controller
    /// with fresh metrics but carrying forward the current `alpha`, since
    /// forks share the network conditions that produced it.
    pub fn fork(&self) -> Self {
        Self {
            uuid: next_uuid(),
            node_id: self.node_id,
            alpha: self.alpha,
            consecutive_growth: 0,
            last_congestion_time: None,
            calling_context: self.calling_context,
            metrics: MetricsTracker::new(),
            config: self.config,
        }
    }

    /// `pkts_acked(tcb, segments_acked, rtt)` (§4.6): updates metrics only.
    pub fn pkts_acked<T: TransportControlBlock>(
        &mut self,
        tcb: Option<&mut T>,
        segments_acked: u32,
        rtt: core::time::Duration,
    ) {
        let Some(tcb) = tcb else {
            warn_null_tcb("pkts_acked");
            return;
        };

        let now = tcb.now();
        self.metrics.on_pkts_acked(
            segments_acked,
            tcb.segment_size(),
            Some(rtt),
            tcb.min_rtt(),
            now,
        );
    }

    /// `congestion_state_set(tcb, new_state)` (§4.6): records state; no
    /// window mutation. The host's `ca_state` already lives on the `tcb`
    /// itself, so this is a no-op observation point reserved for future
    /// diagnostics/export hooks — idempotent by construction, satisfying
    /// §8's "congestion_state_set(Open) followed by congestion_state_set
    /// (Open) produces identical internal state".
    pub fn congestion_state_set<T: TransportControlBlock>(&mut self, tcb: Option<&mut T>) {
        if tcb.is_none() {
            warn_null_tcb("congestion_state_set");
        }
    }

    /// `cwnd_event(tcb, event)` (§4.6): updates ECN tracking per event kind.
    pub fn cwnd_event<T: TransportControlBlock>(
        &mut self,
        tcb: Option<&mut T>,
        event: crate::tcb::CaEvent,
    ) {
        let Some(tcb) = tcb else {
            warn_null_tcb("cwnd_event");
            return;
        };

        let now = tcb.now();
        match event {
            crate::tcb::CaEvent::EcnIsCe => self.metrics.on_ecn_is_ce(now, &self.config),
            crate::tcb::CaEvent::EcnNoCe => self.metrics.on_ecn_no_ce(),
            _ => {}
        }
    }

    /// `increase_window(tcb, segments_acked)` (§4.6): runs §4.2 (already
    /// applied via `pkts_acked`), §4.4, then §4.5's increase path, mutating
    /// `tcb.cwnd` in place.
    pub fn increase_window<T: TransportControlBlock>(
        &mut self,
        tcb: Option<&mut T>,
        segments_acked: u32,
    ) {
        let Some(tcb) = tcb else {
            warn_null_tcb("increase_window");
            return;
        };

        self.calling_context = CallingContext::Increase;
        let now = tcb.now();

        let ecn_events_in_window = self.metrics.ecn_events_in_window(now, &self.config);
        let verdict = fusion::classify(
            self.calling_context,
            self.metrics.ecn_recent(),
            ecn_events_in_window,
            tcb.ca_state(),
            &self.config,
        );

        if verdict.is_congestion() {
            self.consecutive_growth = 0;
        }

        let ecn_rate_per_sec =
            ecn_events_in_window as f64 / self.config.ecn_window.as_secs_f64().max(f64::EPSILON);

        self.alpha = alpha::update(
            self.alpha,
            AlphaInputs {
                min_rtt: tcb.min_rtt(),
                last_rtt: self.metrics.last_rtt(),
                ecn_recent: self.metrics.ecn_recent(),
                ecn_rate_per_sec,
                ca_state: tcb.ca_state(),
                consecutive_growth: self.consecutive_growth,
            },
            &self.config,
        );

        let bdp = window::estimate_bdp(
            self.metrics.peak_throughput(),
            tcb.cwnd(),
            tcb.min_rtt(),
            self.metrics.last_rtt(),
        );

        let (new_cwnd, new_growth) = window::on_increase(
            tcb.cwnd(),
            tcb.ssthresh(),
            tcb.segment_size(),
            segments_acked,
            bdp,
            self.alpha,
            self.consecutive_growth,
            &self.config,
        );

        // A congestion verdict already reset `consecutive_growth` to 0
        // above; §4.4 specifies the increment itself is skipped in that
        // case, so only a benign verdict advances the counter.
        if !verdict.is_congestion() {
            self.consecutive_growth = new_growth;
        }

        tcb.set_cwnd(new_cwnd);
    }

    /// `get_ssthresh(tcb, bytes_in_flight)` (§4.6): sets
    /// `calling_context = Loss-SsThresh`, runs §4.3 then §4.5's
    /// congestion-event path, returns the new `ssthresh`.
    ///
    /// Returns `None` on a null `tcb` (§7.1: "preserve existing
    /// cwnd/ssthresh" — with no `tcb` to read from, there is nothing to
    /// compute a new value against, so the host should leave its own state
    /// untouched).
    pub fn get_ssthresh<T: TransportControlBlock>(
        &mut self,
        tcb: Option<&mut T>,
        bytes_in_flight: u32,
    ) -> Option<u32> {
        let Some(tcb) = tcb else {
            warn_null_tcb("get_ssthresh");
            return None;
        };

        self.calling_context = CallingContext::LossSsThresh;
        let now = tcb.now();

        let ecn_events_in_window = self.metrics.ecn_events_in_window(now, &self.config);
        let verdict = fusion::classify(
            self.calling_context,
            self.metrics.ecn_recent(),
            ecn_events_in_window,
            tcb.ca_state(),
            &self.config,
        );

        let new_ssthresh = window::on_congestion_event(
            verdict,
            tcb.cwnd(),
            bytes_in_flight,
            tcb.segment_size(),
            &self.config,
        );

        tcb.set_ssthresh(new_ssthresh);
        tcb.set_cwnd(new_ssthresh);
        self.consecutive_growth = 0;
        self.last_congestion_time = Some(now);

        Some(new_ssthresh)
    }

    /// Assembles the 15-field observation vector for the current callback
    /// (§4.1). Optional: the runtime decisions above never consult this.
    pub fn observe<T: TransportControlBlock>(
        &self,
        tcb: &T,
        segments_acked: u32,
        bytes_in_flight: Option<u32>,
    ) -> Observation {
        Observation {
            uuid: self.uuid,
            env_type: 0,
            sim_time_us: tcb.now().saturating_duration_since(Timestamp::ZERO).as_micros() as u64,
            node_id: self.node_id,
            ssthresh: tcb.ssthresh() as u64,
            cwnd: tcb.cwnd() as u64,
            segment_size: tcb.segment_size() as u64,
            segments_acked: segments_acked as u64,
            bytes_in_flight: bytes_in_flight.unwrap_or_else(|| tcb.bytes_in_flight()) as u64,
            last_rtt_us: self
                .metrics
                .last_rtt()
                .map(|d| d.as_micros() as u64)
                .unwrap_or(0),
            min_rtt_us: tcb.min_rtt().map(|d| d.as_micros() as u64).unwrap_or(0),
            calling_context: self.calling_context,
            ca_state: tcb.ca_state(),
            ca_event: tcb.ca_event(),
            ecn_state: tcb.ecn_state(),
        }
    }
}

/// Logs a host-contract violation at `warn` and returns, per §7.1: "log at
/// warn with the callback name, return a safe no-op, preserve existing
/// cwnd/ssthresh. Never abort."
#[inline]
fn warn_null_tcb(callback: &str) {
    #[cfg(feature = "tracing")]
    tracing::warn!(callback, "Lark dispatcher invoked with a null tcb");
    #[cfg(not(feature = "tracing"))]
    let _ = callback;
}
