// SPDX-License-Identifier: Apache-2.0

//! Read-once configuration, stable for the life of a connection (§6).

use core::time::Duration;

/// Tunable parameters for a `Lark` controller, read once at construction.
///
/// Mirrors the table in §6 of the design: defaults match the reference
/// values exactly, so `Config::default()` is what the host gets unless it
/// explicitly overrides a field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub alpha_initial: f32,
    pub alpha_min: f32,
    pub alpha_max: f32,
    pub ecn_window: Duration,
    pub ecn_burst_threshold: u32,
    pub ecn_rate_high: u32,
    pub retention_loss: f32,
    pub retention_ecn: f32,
    pub retention_timeout: f32,
    pub retention_default: f32,
    pub min_cwnd_segments: u32,
    pub cwnd_cap_segments: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha_initial: 1.25,
            alpha_min: 1.10,
            alpha_max: 1.50,
            ecn_window: Duration::from_secs(1),
            ecn_burst_threshold: 30,
            ecn_rate_high: 50,
            retention_loss: 0.70,
            retention_ecn: 0.92,
            retention_timeout: 0.75,
            retention_default: 0.90,
            min_cwnd_segments: 4,
            cwnd_cap_segments: 100,
        }
    }
}
