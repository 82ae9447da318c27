// SPDX-License-Identifier: Apache-2.0

//! The host transport's per-connection state, as seen by Lark.
//!
//! Lark never owns a `TransportControlBlock`; the host transport does, and
//! exposes it across the dispatcher boundary (§3.1, §6 of the design). Lark
//! reads it on every callback and, on `increase_window`/`get_ssthresh`,
//! mutates `cwnd`/`ssthresh` through the same trait.

use crate::time::Timestamp;

/// The host's coarse congestion-state machine (§3.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaState {
    Open,
    Disorder,
    Cwr,
    Recovery,
    Loss,
}

/// The most recent congestion-avoidance event reported by the host (§3.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaEvent {
    TxStart,
    CwndRestart,
    CompleteCwr,
    Loss,
    EcnNoCe,
    EcnIsCe,
}

/// The host's ECN sub-state (§3.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EcnState {
    Disabled,
    Idle,
    CeRcvd,
    SendingEce,
    EceRcvd,
    CwrSent,
}

/// Read-only (mostly) transport state that the host exposes to Lark for a
/// single connection.
///
/// The host is the sole owner; Lark borrows it for the duration of a
/// dispatcher call (§3.3). `set_cwnd`/`set_ssthresh` are the only mutating
/// methods, used by the window policy (§4.5) to return its decisions.
pub trait TransportControlBlock {
    /// Current congestion window, in bytes.
    fn cwnd(&self) -> u32;

    /// Sets the congestion window, in bytes.
    fn set_cwnd(&mut self, cwnd: u32);

    /// Current slow-start threshold, in bytes.
    fn ssthresh(&self) -> u32;

    /// Sets the slow-start threshold, in bytes.
    fn set_ssthresh(&mut self, ssthresh: u32);

    /// The transport's chosen segment size (MSS), in bytes.
    fn segment_size(&self) -> u32;

    /// Bytes currently in flight (unacknowledged), in bytes.
    fn bytes_in_flight(&self) -> u32;

    /// The minimum RTT observed over the connection's lifetime, or `None`
    /// if not yet measured (the "sentinel" of §3.1/§4.1).
    fn min_rtt(&self) -> Option<core::time::Duration>;

    /// The most recently measured RTT, or `None` if not yet measured.
    fn last_rtt(&self) -> Option<core::time::Duration>;

    fn ca_state(&self) -> CaState;

    fn ca_event(&self) -> CaEvent;

    fn ecn_state(&self) -> EcnState;

    /// The host's clock, sampled at callback entry.
    fn now(&self) -> Timestamp;
}
