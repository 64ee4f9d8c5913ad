/// Ladder filters built from quantized components.
///
/// A ladder is a source termination in series, a sequence of stages, and a
/// load termination in shunt:
///
///   cascade(series(source), stage_1, ..., stage_n, shunt(load))
///
/// Each stage is the parallel combination of its components, inserted either
/// in the series arm or across the line. Stages and filters are immutable;
/// `update` returns a neighbor in which every component has taken one
/// independent step along its value table.

use std::fmt;

use rand::Rng;

use crate::component::{Component, ComponentKind, ComponentValue};
use crate::error::Result;
use crate::load::Load;
use crate::two_port::TwoPortNetwork;

/// Where a stage sits in the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageRole {
    Series,
    Shunt,
}

/// Components combined in parallel, placed in one arm of the ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    role: StageRole,
    components: Vec<Component>,
}

impl FilterStage {
    pub fn new(role: StageRole, components: Vec<Component>) -> Self {
        Self { role, components }
    }

    pub fn series(components: Vec<Component>) -> Self {
        Self::new(StageRole::Series, components)
    }

    pub fn shunt(components: Vec<Component>) -> Self {
        Self::new(StageRole::Shunt, components)
    }

    pub fn role(&self) -> StageRole {
        self.role
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn network(&self) -> TwoPortNetwork {
        let load = Load::parallel(self.components.iter().map(Component::load));
        match self.role {
            StageRole::Series => TwoPortNetwork::series(load),
            StageRole::Shunt => TwoPortNetwork::shunt(load),
        }
    }

    pub fn update<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            role: self.role,
            components: self.components.iter().map(|c| c.update(rng)).collect(),
        }
    }
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self.role {
            StageRole::Series => "series",
            StageRole::Shunt => "shunt ",
        };
        write!(f, "{role}:")?;
        for (i, c) in self.components.iter().enumerate() {
            let sep = if i == 0 { " " } else { " || " };
            write!(f, "{sep}{c}")?;
        }
        Ok(())
    }
}

/// Terminated ladder network.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    input: Load,
    output: Load,
    stages: Vec<FilterStage>,
}

impl Filter {
    pub fn new(input: Load, output: Load, stages: Vec<FilterStage>) -> Self {
        Self { input, output, stages }
    }

    /// Alternating series-inductor / shunt-capacitor ladder with random E24
    /// values. Ranges are `(min, max)`.
    pub fn random_ladder<R: Rng + ?Sized>(
        input: Load,
        output: Load,
        n_stages: usize,
        inductance: (f64, f64),
        capacitance: (f64, f64),
        rng: &mut R,
    ) -> Result<Self> {
        let mut stages = Vec::with_capacity(n_stages);
        for i in 0..n_stages {
            let stage = if i % 2 == 0 {
                let (min, max) = inductance;
                let value = ComponentValue::randomize(max, min, false, false, rng)?;
                FilterStage::series(vec![Component::new(ComponentKind::Inductor, value)])
            } else {
                let (min, max) = capacitance;
                let value = ComponentValue::randomize(max, min, false, false, rng)?;
                FilterStage::shunt(vec![Component::new(ComponentKind::Capacitor, value)])
            };
            stages.push(stage);
        }
        Ok(Self::new(input, output, stages))
    }

    pub fn input(&self) -> &Load {
        &self.input
    }

    pub fn output(&self) -> &Load {
        &self.output
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn network(&self) -> TwoPortNetwork {
        let mut chain = Vec::with_capacity(self.stages.len() + 2);
        chain.push(TwoPortNetwork::series(self.input.clone()));
        chain.extend(self.stages.iter().map(FilterStage::network));
        chain.push(TwoPortNetwork::shunt(self.output.clone()));
        TwoPortNetwork::cascade(chain)
    }

    /// Neighbor filter; terminations are carried over unchanged.
    pub fn update<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            input: self.input.clone(),
            output: self.output.clone(),
            stages: self.stages.iter().map(|s| s.update(rng)).collect(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            writeln!(f, "  stage {:>2}  {stage}", i + 1)?;
        }
        Ok(())
    }
}
