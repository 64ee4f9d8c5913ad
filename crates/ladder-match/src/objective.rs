/// Matching-network objective: flat passband, maximum mean gain.
///
/// The voltage-gain magnitude is sampled at `n_samples` evenly spaced angular
/// frequencies over the right-open band `[2π f_min, 2π f_max)`; the sample
/// at `f_max` itself is never taken. Flatness is a hard wall: a peak-to-trough
/// spread above `max_gain_deviation_db` costs `+inf`. Inside the wall the cost
/// is `-10 log10(mean gain)`, so lower cost means more gain.

use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::two_port::TwoPortNetwork;

/// Scalar cost of a candidate network. Lower is better; `+inf` is infeasible.
pub trait Objective {
    fn cost(&self, network: &TwoPortNetwork) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&TwoPortNetwork) -> f64,
{
    fn cost(&self, network: &TwoPortNetwork) -> f64 {
        self(network)
    }
}

/// Gain-magnitude summary over the sampled band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl GainStats {
    /// Peak-to-trough spread in dB.
    pub fn deviation_db(&self) -> f64 {
        20.0 * (self.max / self.min).log10()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchingObjective {
    min_frequency: f64,
    max_frequency: f64,
    max_gain_deviation_db: f64,
    n_samples: usize,
}

impl MatchingObjective {
    /// Frequencies in Hz. Requires `0 <= min_frequency <= max_frequency`,
    /// a non-negative deviation limit, and at least one sample.
    pub fn new(
        min_frequency: f64,
        max_frequency: f64,
        max_gain_deviation_db: f64,
        n_samples: usize,
    ) -> Result<Self> {
        if !(min_frequency >= 0.0 && min_frequency <= max_frequency && max_frequency.is_finite()) {
            return Err(Error::InvalidObjective(format!(
                "band must satisfy 0 <= min <= max < inf, got [{min_frequency}, {max_frequency}]"
            )));
        }
        if !(max_gain_deviation_db >= 0.0) {
            return Err(Error::InvalidObjective(format!(
                "max gain deviation must be >= 0 dB, got {max_gain_deviation_db}"
            )));
        }
        if n_samples == 0 {
            return Err(Error::InvalidObjective("need at least one sample".into()));
        }
        Ok(Self {
            min_frequency,
            max_frequency,
            max_gain_deviation_db,
            n_samples,
        })
    }

    /// Angular frequencies at which the gain is sampled.
    pub fn sample_points(&self) -> impl Iterator<Item = f64> + '_ {
        let start = 2.0 * PI * self.min_frequency;
        let step = 2.0 * PI * (self.max_frequency - self.min_frequency) / self.n_samples as f64;
        (0..self.n_samples).map(move |i| start + i as f64 * step)
    }

    /// Min, max, and mean gain magnitude over the band.
    ///
    /// NaN samples (an open arm meeting a short, etc.) poison the stats so
    /// that `cost` can reject them.
    pub fn measure(&self, network: &TwoPortNetwork) -> GainStats {
        let mut min = f64::INFINITY;
        let mut max = 0.0f64;
        let mut sum = 0.0;
        let mut poisoned = false;
        for omega in self.sample_points() {
            let g = network.voltage_gain_at(omega).norm();
            poisoned |= g.is_nan();
            min = min.min(g);
            max = max.max(g);
            sum += g;
        }
        if poisoned {
            return GainStats { min: f64::NAN, max: f64::NAN, mean: f64::NAN };
        }
        GainStats {
            min,
            max,
            mean: sum / self.n_samples as f64,
        }
    }

    /// Cost of `network`; `+inf` when the band is not flat enough, the gain
    /// vanishes or blows up, or the response is undefined.
    pub fn evaluate(&self, network: &TwoPortNetwork) -> f64 {
        let stats = self.measure(network);
        // An infinite gain anywhere is a resonance, never a good match.
        if stats.mean.is_nan() || stats.max.is_infinite() {
            return f64::INFINITY;
        }
        if stats.deviation_db() > self.max_gain_deviation_db {
            return f64::INFINITY;
        }
        if stats.mean == 0.0 {
            return f64::INFINITY;
        }
        -10.0 * stats.mean.log10()
    }
}

impl Objective for MatchingObjective {
    fn cost(&self, network: &TwoPortNetwork) -> f64 {
        self.evaluate(network)
    }
}

/// Closure form of [`MatchingObjective`].
pub fn make_matching_network_objective(
    min_frequency: f64,
    max_frequency: f64,
    max_gain_deviation_db: f64,
    n_samples: usize,
) -> Result<impl Fn(&TwoPortNetwork) -> f64> {
    let objective =
        MatchingObjective::new(min_frequency, max_frequency, max_gain_deviation_db, n_samples)?;
    Ok(move |network: &TwoPortNetwork| objective.evaluate(network))
}
