// SPDX-License-Identifier: Apache-2.0

/// Example host harness wiring a [`lark::Lark`] controller to a synthetic
/// connection.
///
/// Lark has no socket, timer, or ACK processing of its own, so unlike a
/// `CongestionController` plugged directly into a QUIC/TCP stack, a host
/// here is just whatever owns the `TransportControlBlock` and decides when
/// to call the six dispatcher entry points. This harness stands in for that
/// host: it drives a fixed, synthetic sequence of transmit/ack/ECN/loss
/// events through a real `Lark` instance and reports the resulting window.
pub mod simulated_host {
    use core::time::Duration;
    use lark::{
        tcb::{CaEvent, CaState, EcnState, TransportControlBlock},
        time::Timestamp,
        Lark,
    };

    /// A minimal TCB: enough state for `Lark` to read and mutate, nothing a
    /// real transport would also need (retransmission queues, socket
    /// buffers, etc).
    #[derive(Debug, Clone)]
    pub struct SimulatedTcb {
        cwnd: u32,
        ssthresh: u32,
        segment_size: u32,
        bytes_in_flight: u32,
        min_rtt: Option<Duration>,
        last_rtt: Option<Duration>,
        ca_state: CaState,
        ca_event: CaEvent,
        ecn_state: EcnState,
        now: Timestamp,
    }

    impl SimulatedTcb {
        pub fn new(segment_size: u32) -> Self {
            Self {
                cwnd: 10 * segment_size,
                ssthresh: u32::MAX,
                segment_size,
                bytes_in_flight: 0,
                min_rtt: None,
                last_rtt: None,
                ca_state: CaState::Open,
                ca_event: CaEvent::TxStart,
                ecn_state: EcnState::Disabled,
                now: Timestamp::ZERO,
            }
        }

        pub fn advance(&mut self, by: Duration) {
            self.now = self.now + by;
        }

        pub fn set_rtt(&mut self, rtt: Duration) {
            self.last_rtt = Some(rtt);
            self.min_rtt = Some(self.min_rtt.map_or(rtt, |m| m.min(rtt)));
        }

        pub fn set_ca_state(&mut self, ca_state: CaState) {
            self.ca_state = ca_state;
        }

        pub fn cwnd(&self) -> u32 {
            self.cwnd
        }

        pub fn ssthresh(&self) -> u32 {
            self.ssthresh
        }
    }

    impl TransportControlBlock for SimulatedTcb {
        fn cwnd(&self) -> u32 {
            self.cwnd
        }

        fn set_cwnd(&mut self, cwnd: u32) {
            self.cwnd = cwnd;
        }

        fn ssthresh(&self) -> u32 {
            self.ssthresh
        }

        fn set_ssthresh(&mut self, ssthresh: u32) {
            self.ssthresh = ssthresh;
        }

        fn segment_size(&self) -> u32 {
            self.segment_size
        }

        fn bytes_in_flight(&self) -> u32 {
            self.bytes_in_flight
        }

        fn min_rtt(&self) -> Option<Duration> {
            self.min_rtt
        }

        fn last_rtt(&self) -> Option<Duration> {
            self.last_rtt
        }

        fn ca_state(&self) -> CaState {
            self.ca_state
        }

        fn ca_event(&self) -> CaEvent {
            self.ca_event
        }

        fn ecn_state(&self) -> EcnState {
            self.ecn_state
        }

        fn now(&self) -> Timestamp {
            self.now
        }
    }

    /// Runs a fixed scripted session: a few rounds of clean slow start, an
    /// ECN burst, then a single loss, printing the `cwnd`/`alpha` after each
    /// step. Returns the final controller and TCB for inspection.
    pub fn run_demo_session() -> (Lark, SimulatedTcb) {
        let mut lark = Lark::with_defaults(1);
        let mut tcb = SimulatedTcb::new(1448);
        tcb.set_rtt(Duration::from_millis(1));

        println!("start: cwnd={} alpha={:.3}", tcb.cwnd(), lark.alpha());

        for round in 0..5 {
            tcb.advance(Duration::from_millis(1));
            lark.pkts_acked(Some(&mut tcb), 4, Duration::from_millis(1));
            lark.increase_window(Some(&mut tcb), 4);
            println!(
                "round {round}: cwnd={} alpha={:.3}",
                tcb.cwnd(),
                lark.alpha()
            );
        }

        for _ in 0..35 {
            lark.cwnd_event(Some(&mut tcb), CaEvent::EcnIsCe);
            tcb.advance(Duration::from_millis(20));
        }
        if let Some(new_ssthresh) = lark.get_ssthresh(Some(&mut tcb), tcb.cwnd()) {
            println!(
                "ecn burst: new_ssthresh={new_ssthresh} cwnd={}",
                tcb.cwnd()
            );
        }

        tcb.set_ca_state(CaState::Recovery);
        if let Some(new_ssthresh) = lark.get_ssthresh(Some(&mut tcb), tcb.cwnd()) {
            println!("loss: new_ssthresh={new_ssthresh} cwnd={}", tcb.cwnd());
        }

        (lark, tcb)
    }
}
