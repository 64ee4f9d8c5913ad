//! LC ladder matching-network synthesis.
//!
//! Pure math with no I/O: ABCD two-port algebra, E24 component quantization,
//! and a simulated-annealing search over ladder component values.

// Circuit algebra
pub mod load;
pub mod two_port;

// Discrete component model and ladder topology
pub mod component;
pub mod filter;

// Search
pub mod anneal;
pub mod objective;

pub mod error;

pub use anneal::{AnnealConfig, AnnealOutcome, Annealer, anneal, optimize_filter};
pub use component::{Component, ComponentKind, ComponentValue};
pub use error::{Error, Result};
pub use filter::{Filter, FilterStage, StageRole};
pub use load::Load;
pub use objective::{GainStats, MatchingObjective, Objective, make_matching_network_objective};
pub use two_port::{AbcdMatrix, TwoPortNetwork};

/// Log-spaced frequencies from `start_hz` to `end_hz` inclusive.
pub fn log_sweep(start_hz: f64, end_hz: f64, points: usize) -> Vec<f64> {
    let (log_start, log_end) = (start_hz.ln(), end_hz.ln());
    (0..points)
        .map(|i| {
            let frac = i as f64 / (points.saturating_sub(1)).max(1) as f64;
            (log_start + frac * (log_end - log_start)).exp()
        })
        .collect()
}
