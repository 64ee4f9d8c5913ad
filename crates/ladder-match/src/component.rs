//! Quantized component values drawn from the E24 preferred-number series.
//!
//! A `ComponentValue` is an index into a shared, read-only table of feasible
//! values. Perturbation moves the index one step left or right and returns a
//! new value; the table itself is never copied, only its `Arc`.

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::error::{Error, Result, check_non_negative};
use crate::load::{Load, LoadKind};

/// E24 preferred numbers for one decade (IEC 60063).
pub const E24: [f64; 24] = [
    1.0, 1.1, 1.2, 1.3, 1.5, 1.6, 1.8, 2.0, 2.2, 2.4, 2.7, 3.0, 3.3, 3.6, 3.9, 4.3, 4.7, 5.1, 5.6,
    6.2, 6.8, 7.5, 8.2, 9.1,
];

fn check_range(min: f64, max: f64) -> Result<()> {
    // `max` must be finite so the decade walk terminates; inf is opt-in via allow_infinite.
    if min > 0.0 && min <= max && max.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidRange { min, max })
    }
}

/// Every E24 value `e * 10^k` inside `[min, max]`, ascending.
///
/// Decades run from `floor(log10(min))` to `ceil(log10(max))`. Adjacent
/// decades cannot collide, so the result is strictly ascending as built.
pub fn feasible_preferred_values(min: f64, max: f64) -> Result<Vec<f64>> {
    check_range(min, max)?;
    let k_lo = min.log10().floor() as i32;
    let k_hi = max.log10().ceil() as i32;

    let mut values = Vec::with_capacity(E24.len() * (k_hi - k_lo + 1) as usize);
    for k in k_lo..=k_hi {
        for e in E24 {
            // Divide for negative decades: 10^|k| is exact, 10^-|k| is not.
            let v = if k >= 0 {
                e * 10f64.powi(k)
            } else {
                e / 10f64.powi(-k)
            };
            if v >= min && v <= max {
                values.push(v);
            }
        }
    }
    Ok(values)
}

/// Index of the table entry closest to `value`.
///
/// Below the table clamps to 0 and above clamps to the last index. Between
/// two entries, a tie goes to the upper one. `sorted` must be non-empty and
/// ascending.
pub fn nearest_neighbor_index(value: f64, sorted: &[f64]) -> usize {
    let upper = sorted.partition_point(|&x| x < value);
    if upper == 0 {
        return 0;
    }
    if upper == sorted.len() {
        return sorted.len() - 1;
    }
    if sorted[upper] == value {
        return upper;
    }
    if sorted[upper] - value <= value - sorted[upper - 1] {
        upper
    } else {
        upper - 1
    }
}

/// A value snapped to a feasible table, plus its position in that table.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentValue {
    table: Arc<[f64]>,
    index: usize,
}

impl ComponentValue {
    /// Build the E24 table for `[min, max]`, optionally with `0` prepended
    /// and `+inf` appended, and snap `initial` to its nearest entry.
    pub fn initialize(
        initial: f64,
        max: f64,
        min: f64,
        allow_zero: bool,
        allow_infinite: bool,
    ) -> Result<Self> {
        check_non_negative("initial value", initial)?;
        let mut values = feasible_preferred_values(min, max)?;
        if allow_zero {
            values.insert(0, 0.0);
        }
        if allow_infinite {
            values.push(f64::INFINITY);
        }
        if values.is_empty() {
            return Err(Error::EmptyValueTable { min, max });
        }
        let index = nearest_neighbor_index(initial, &values);
        Ok(Self { table: values.into(), index })
    }

    /// Like `initialize`, starting from a uniformly random value in `[min, max]`.
    pub fn randomize<R: Rng + ?Sized>(
        max: f64,
        min: f64,
        allow_zero: bool,
        allow_infinite: bool,
        rng: &mut R,
    ) -> Result<Self> {
        check_range(min, max)?;
        let initial = rng.gen_range(min..=max);
        Self::initialize(initial, max, min, allow_zero, allow_infinite)
    }

    pub fn value(&self) -> f64 {
        self.table[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn table(&self) -> &[f64] {
        &self.table
    }

    /// One random-walk step along the table. Shares the table with `self`.
    pub fn update<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            table: Arc::clone(&self.table),
            index: self.next_index(rng),
        }
    }

    fn next_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let last = self.table.len() - 1;
        match self.index {
            _ if last == 0 => 0,
            0 => 1,
            i if i == last => last - 1,
            i => {
                if rng.gen_bool(0.5) {
                    i + 1
                } else {
                    i - 1
                }
            }
        }
    }
}

/// Electrical part type; decides which load a value becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Capacitor,
    Inductor,
    Resistor,
}

impl ComponentKind {
    pub fn unit(self) -> &'static str {
        match self {
            Self::Capacitor => "F",
            Self::Inductor => "H",
            Self::Resistor => "Ω",
        }
    }

    fn symbol(self) -> char {
        match self {
            Self::Capacitor => 'C',
            Self::Inductor => 'L',
            Self::Resistor => 'R',
        }
    }

    /// Table values are never negative, so no validation here.
    fn load(self, value: f64) -> Load {
        Load::from_kind(match self {
            Self::Capacitor => LoadKind::Capacitor(value),
            Self::Inductor => LoadKind::Inductor(value),
            Self::Resistor => LoadKind::Resistor(value),
        })
    }
}

/// A named part with a quantized value.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    kind: ComponentKind,
    value: ComponentValue,
}

impl Component {
    pub fn new(kind: ComponentKind, value: ComponentValue) -> Self {
        Self { kind, value }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn value(&self) -> &ComponentValue {
        &self.value
    }

    pub fn load(&self) -> Load {
        self.kind.load(self.value.value())
    }

    pub fn update<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            kind: self.kind,
            value: self.value.update(rng),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.symbol(), format_si(self.value.value(), self.kind.unit()))
    }
}

/// Engineering notation: `2.2e-9, "F"` -> `2.2 nF`.
pub fn format_si(value: f64, unit: &str) -> String {
    const PREFIXES: [(f64, &str); 9] = [
        (1e9, "G"),
        (1e6, "M"),
        (1e3, "k"),
        (1.0, ""),
        (1e-3, "m"),
        (1e-6, "µ"),
        (1e-9, "n"),
        (1e-12, "p"),
        (1e-15, "f"),
    ];

    if value == 0.0 || !value.is_finite() {
        return format!("{value} {unit}");
    }
    let (scale, prefix) = PREFIXES
        .iter()
        .copied()
        .find(|&(scale, _)| value.abs() >= scale * (1.0 - 1e-9))
        .unwrap_or(PREFIXES[PREFIXES.len() - 1]);
    let mantissa = (value / scale * 1000.0).round() / 1000.0;
    format!("{mantissa} {prefix}{unit}")
}
