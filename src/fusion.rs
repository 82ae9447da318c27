// SPDX-License-Identifier: Apache-2.0

//! The fusion detector (§4.3): classifies each congestion-opportunity into a
//! verdict using hierarchical priority, biased toward throughput by
//! deliberately suppressing transient single-signal noise.

use crate::{config::Config, observation::CallingContext, tcb::CaState};

/// Output of the fusion detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Loss,
    EcnBurst,
    Timeout,
    Benign,
}

impl Verdict {
    /// Severity weights from §4.3; not consulted by the window policy
    /// directly (retention factors in §4.5 already encode the response),
    /// but kept alongside the verdict for diagnostics/export parity with the
    /// design's stated severities.
    pub fn severity(self) -> f32 {
        match self {
            Verdict::Loss => 0.7,
            Verdict::EcnBurst => 0.3,
            Verdict::Timeout => 0.6,
            Verdict::Benign => 0.0,
        }
    }

    #[inline]
    pub fn is_congestion(self) -> bool {
        !matches!(self, Verdict::Benign)
    }
}

/// Priority-ordered verdict selection (§4.3). First matching rule wins.
///
/// `ecn_marked` corresponds to "ECN not currently marked" in rule 1 — the
/// host's `ecn_state` indicating an outstanding CE mark that hasn't yet been
/// cleared by `EcnNoCe` (§3.1, §4.2's `ecn_recent` flag).
///
/// `calling_context == loss-ssthresh` holds on every `get_ssthresh` call,
/// including ones driven by an RTO timeout, so rule 1 is scoped to
/// `ca_state != Loss`: otherwise rule 3 (timeout) could never win, since
/// rule 1 would already have matched whenever ECN isn't marked — which is
/// also true of the common RTO case. This keeps the stated priority order
/// (loss, then ECN burst, then timeout) meaningful for both a
/// fast-retransmit-style loss (`ca_state` is `Disorder`/`Recovery`) and an
/// RTO (`ca_state == Loss`), matching the design's own worked examples.
#[inline]
pub fn classify(
    calling_context: CallingContext,
    ecn_marked: bool,
    ecn_events_in_window: usize,
    ca_state: CaState,
    config: &Config,
) -> Verdict {
    if calling_context == CallingContext::LossSsThresh
        && !ecn_marked
        && ca_state != CaState::Loss
    {
        return Verdict::Loss;
    }

    if ecn_events_in_window >= config.ecn_burst_threshold as usize {
        return Verdict::EcnBurst;
    }

    if ca_state == CaState::Loss {
        return Verdict::Timeout;
    }

    Verdict::Benign
}
