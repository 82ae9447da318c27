// SPDX-License-Identifier: Apache-2.0

//! Lark: a host-driven TCP congestion control decision engine for
//! data-center networks.
//!
//! Lark does not own a socket, a timer, or ACK processing. It is invoked by
//! a host transport through six dispatcher entry points exposed on
//! [`Lark`](controller::Lark) — [`Lark::pkts_acked`](controller::Lark::pkts_acked),
//! [`Lark::congestion_state_set`](controller::Lark::congestion_state_set),
//! [`Lark::cwnd_event`](controller::Lark::cwnd_event),
//! [`Lark::increase_window`](controller::Lark::increase_window),
//! [`Lark::get_ssthresh`](controller::Lark::get_ssthresh), and
//! [`Lark::fork`](controller::Lark::fork) — and reads/writes the host's
//! [`TransportControlBlock`](tcb::TransportControlBlock) in place.
//!
//! On every increase opportunity Lark fuses loss, ECN, RTT-inflation, and
//! coarse CA-state signals into a verdict, adapts a multiplicative factor
//! `alpha` from that verdict, and derives a bandwidth-delay-product-based
//! window from it. On a congestion event it picks a retention factor by
//! verdict and shrinks the window multiplicatively.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use lark::{Lark, tcb::{CaEvent, CaState, EcnState, TransportControlBlock}, time::Timestamp};
//!
//! struct DemoTcb {
//!     cwnd: u32,
//!     ssthresh: u32,
//!     now: Timestamp,
//! }
//!
//! impl TransportControlBlock for DemoTcb {
//!     fn cwnd(&self) -> u32 { self.cwnd }
//!     fn set_cwnd(&mut self, cwnd: u32) { self.cwnd = cwnd; }
//!     fn ssthresh(&self) -> u32 { self.ssthresh }
//!     fn set_ssthresh(&mut self, ssthresh: u32) { self.ssthresh = ssthresh; }
//!     fn segment_size(&self) -> u32 { 1448 }
//!     fn bytes_in_flight(&self) -> u32 { self.cwnd }
//!     fn min_rtt(&self) -> Option<Duration> { Some(Duration::from_millis(1)) }
//!     fn last_rtt(&self) -> Option<Duration> { Some(Duration::from_millis(1)) }
//!     fn ca_state(&self) -> CaState { CaState::Open }
//!     fn ca_event(&self) -> CaEvent { CaEvent::TxStart }
//!     fn ecn_state(&self) -> EcnState { EcnState::Disabled }
//!     fn now(&self) -> Timestamp { self.now }
//! }
//!
//! let mut lark = Lark::with_defaults(1);
//! let mut tcb = DemoTcb { cwnd: 10 * 1448, ssthresh: u32::MAX, now: Timestamp::ZERO };
//! lark.increase_window(Some(&mut tcb), 2);
//! assert!(tcb.cwnd >= 10 * 1448);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod alpha;
pub mod config;
pub mod controller;
pub mod fusion;
pub mod metrics;
pub mod observation;
pub mod tcb;
pub mod time;
pub mod window;

pub use config::Config;
pub use controller::Lark;
pub use fusion::Verdict;
pub use observation::Observation;
pub use tcb::TransportControlBlock;
pub use time::Timestamp;
