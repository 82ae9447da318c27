// SPDX-License-Identifier: Apache-2.0

//! The adaptive α controller (§4.4): recomputes the multiplicative factor
//! from RTT inflation, ECN feedback, host congestion state, and growth
//! trend, additively, then clamps to `[alpha_min, alpha_max]`.

use crate::{config::Config, tcb::CaState};
use core::time::Duration;

/// Inputs the α controller needs on an increase opportunity, gathered from
/// the metrics tracker and host TCB by the caller (§4.4).
#[derive(Clone, Copy, Debug)]
pub struct AlphaInputs {
    pub min_rtt: Option<Duration>,
    pub last_rtt: Option<Duration>,
    pub ecn_recent: bool,
    pub ecn_rate_per_sec: f64,
    pub ca_state: CaState,
    pub consecutive_growth: u32,
}

/// Recomputes `alpha` from `inputs`, applying each additive term from §4.4
/// in order, then clamping to `[config.alpha_min, config.alpha_max]`.
#[inline]
pub fn update(alpha: f32, inputs: AlphaInputs, config: &Config) -> f32 {
    let mut delta = 0.0_f32;

    if let (Some(min_rtt), Some(last_rtt)) = (inputs.min_rtt, inputs.last_rtt) {
        if min_rtt > Duration::ZERO && last_rtt > Duration::ZERO {
            let rho = last_rtt.as_secs_f64() / min_rtt.as_secs_f64();
            delta += if rho < 1.5 {
                0.02
            } else if rho < 3.0 {
                0.0
            } else {
                -0.05
            };
        }
    }

    if inputs.ecn_recent {
        delta += -0.03;
    }
    if inputs.ecn_rate_per_sec > config.ecn_rate_high as f64 {
        delta += -0.05;
    }

    delta += match inputs.ca_state {
        CaState::Loss => -0.10,
        CaState::Recovery => -0.03,
        CaState::Open => 0.01,
        CaState::Disorder | CaState::Cwr => 0.0,
    };

    if inputs.consecutive_growth >= 3 {
        delta += 0.02;
    }
    if inputs.consecutive_growth >= 6 {
        delta += 0.02;
    }

    (alpha + delta).clamp(config.alpha_min, config.alpha_max)
}
