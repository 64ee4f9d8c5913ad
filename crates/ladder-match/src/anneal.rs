//! Simulated-annealing search over ladder component values.
//!
//! Each iteration perturbs every component of the current filter by one
//! table step, prices the neighbor, and accepts it if it is no worse or with
//! probability `2^(-Δ/T)` otherwise. Temperature decays geometrically every
//! iteration. The run returns the *final* state, not the best one visited.

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::objective::Objective;

pub const DEFAULT_INITIAL_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_COOLING_RATE: f64 = 1e-3;
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Annealing schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealConfig {
    /// Starting temperature, in cost units. Must be > 0.
    pub initial_temperature: f64,
    /// Fraction of the temperature removed per iteration, in (0, 1).
    pub cooling_rate: f64,
    pub iterations: usize,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: DEFAULT_INITIAL_TEMPERATURE,
            cooling_rate: DEFAULT_COOLING_RATE,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl AnnealConfig {
    pub fn new(initial_temperature: f64, cooling_rate: f64, iterations: usize) -> Result<Self> {
        let config = Self {
            initial_temperature,
            cooling_rate,
            iterations,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(Error::InvalidAnnealing(format!(
                "initial temperature must be > 0, got {}",
                self.initial_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(Error::InvalidAnnealing(format!(
                "cooling rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        Ok(())
    }
}

/// Probability of accepting a move that worsens the cost by `delta > 0`.
///
/// Base 2 rather than e. Zero temperature or infinite `delta` gives 0.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    (-delta / temperature).exp2()
}

/// Result of one annealing iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub previous_cost: f64,
    pub candidate_cost: f64,
    pub accepted: bool,
    /// Temperature the acceptance decision was made at.
    pub temperature: f64,
}

/// Finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealOutcome {
    pub filter: Filter,
    pub cost: f64,
    pub accepted: usize,
    pub iterations: usize,
}

/// Annealing state machine: one current filter, its cost, and the temperature.
pub struct Annealer<'a, O: Objective + ?Sized> {
    objective: &'a O,
    current: Filter,
    current_cost: f64,
    temperature: f64,
    cooling_rate: f64,
    accepted: usize,
    iterations: usize,
}

impl<'a, O: Objective + ?Sized> Annealer<'a, O> {
    pub fn new(initial: Filter, objective: &'a O, config: &AnnealConfig) -> Result<Self> {
        config.validate()?;
        let current_cost = objective.cost(&initial.network());
        debug!(
            cost = current_cost,
            temperature = config.initial_temperature,
            "annealer initialized"
        );
        Ok(Self {
            objective,
            current: initial,
            current_cost,
            temperature: config.initial_temperature,
            cooling_rate: config.cooling_rate,
            accepted: 0,
            iterations: 0,
        })
    }

    pub fn current(&self) -> &Filter {
        &self.current
    }

    pub fn current_cost(&self) -> f64 {
        self.current_cost
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Step {
        let candidate = self.current.update(rng);
        let candidate_cost = self.objective.cost(&candidate.network());

        let accepted = candidate_cost <= self.current_cost || {
            let p = acceptance_probability(candidate_cost - self.current_cost, self.temperature);
            rng.gen_range(0.0..1.0) < p
        };

        let step = Step {
            previous_cost: self.current_cost,
            candidate_cost,
            accepted,
            temperature: self.temperature,
        };
        trace!(
            iteration = self.iterations,
            temperature = self.temperature,
            current = self.current_cost,
            candidate = candidate_cost,
            accepted,
            "anneal step"
        );

        if accepted {
            self.current = candidate;
            self.current_cost = candidate_cost;
            self.accepted += 1;
        }
        self.temperature *= 1.0 - self.cooling_rate;
        self.iterations += 1;
        step
    }

    pub fn finish(self) -> AnnealOutcome {
        debug!(
            cost = self.current_cost,
            accepted = self.accepted,
            iterations = self.iterations,
            temperature = self.temperature,
            "annealing finished"
        );
        AnnealOutcome {
            filter: self.current,
            cost: self.current_cost,
            accepted: self.accepted,
            iterations: self.iterations,
        }
    }
}

/// Run a full schedule and report the final state.
pub fn anneal<O, R>(
    initial: Filter,
    objective: &O,
    config: &AnnealConfig,
    rng: &mut R,
) -> Result<AnnealOutcome>
where
    O: Objective + ?Sized,
    R: Rng + ?Sized,
{
    let mut annealer = Annealer::new(initial, objective, config)?;
    for _ in 0..config.iterations {
        annealer.step(rng);
    }
    Ok(annealer.finish())
}

/// Anneal `initial` and return the filter the walk ends on.
pub fn optimize_filter<O, R>(
    initial: Filter,
    objective: &O,
    initial_temperature: f64,
    cooling_rate: f64,
    iterations: usize,
    rng: &mut R,
) -> Result<Filter>
where
    O: Objective + ?Sized,
    R: Rng + ?Sized,
{
    let config = AnnealConfig::new(initial_temperature, cooling_rate, iterations)?;
    Ok(anneal(initial, objective, &config, rng)?.filter)
}
