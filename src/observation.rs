// SPDX-License-Identifier: Apache-2.0

//! The 15-field observation vector (§4.1).
//!
//! Carried internally as a typed record and serialized only at the boundary
//! to an external training/observation channel, per §9's design note ("the
//! 15 uint64 fields are a wire-level serialization for the external agent
//! channel; internally, carry a typed record and serialize only at the
//! boundary"). Lark's own runtime decisions do not consult this struct; it
//! exists for diagnostics and the (out of scope) RL training harness.

use crate::tcb::{CaEvent, CaState, EcnState};

/// Tags which dispatcher entry point produced an `Observation` (§4.1, field
/// 11).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallingContext {
    LossSsThresh,
    Increase,
}

impl CallingContext {
    #[inline]
    fn as_wire(self) -> u64 {
        match self {
            CallingContext::LossSsThresh => 0,
            CallingContext::Increase => 1,
        }
    }
}

/// A single 15-field snapshot of flow state, assembled on every callback
/// entry (§4.1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub uuid: u64,
    pub env_type: u64,
    pub sim_time_us: u64,
    pub node_id: u64,
    pub ssthresh: u64,
    pub cwnd: u64,
    pub segment_size: u64,
    pub segments_acked: u64,
    pub bytes_in_flight: u64,
    pub last_rtt_us: u64,
    pub min_rtt_us: u64,
    pub calling_context: CallingContext,
    pub ca_state: CaState,
    pub ca_event: CaEvent,
    pub ecn_state: EcnState,
}

impl Observation {
    /// Serializes this observation into the 15-element `u64` wire format
    /// described in §4.1/§6. Enum fields are encoded in their declared
    /// ordinal order; all integer fields are already non-negative by
    /// construction (§4.1: "all integer fields are clamped to non-negative").
    #[inline]
    pub fn to_wire(self) -> [u64; 15] {
        [
            self.uuid,
            self.env_type,
            self.sim_time_us,
            self.node_id,
            self.ssthresh,
            self.cwnd,
            self.segment_size,
            self.segments_acked,
            self.bytes_in_flight,
            self.last_rtt_us,
            self.min_rtt_us,
            self.calling_context.as_wire(),
            ca_state_wire(self.ca_state),
            ca_event_wire(self.ca_event),
            ecn_state_wire(self.ecn_state),
        ]
    }
}

#[inline]
fn ca_state_wire(state: CaState) -> u64 {
    match state {
        CaState::Open => 0,
        CaState::Disorder => 1,
        CaState::Cwr => 2,
        CaState::Recovery => 3,
        CaState::Loss => 4,
    }
}

#[inline]
fn ca_event_wire(event: CaEvent) -> u64 {
    match event {
        CaEvent::TxStart => 0,
        CaEvent::CwndRestart => 1,
        CaEvent::CompleteCwr => 2,
        CaEvent::Loss => 3,
        CaEvent::EcnNoCe => 4,
        CaEvent::EcnIsCe => 5,
    }
}

#[inline]
fn ecn_state_wire(state: EcnState) -> u64 {
    match state {
        EcnState::Disabled => 0,
        EcnState::Idle => 1,
        EcnState::CeRcvd => 2,
        EcnState::SendingEce => 3,
        EcnState::EceRcvd => 4,
        EcnState::CwrSent => 5,
    }
}
