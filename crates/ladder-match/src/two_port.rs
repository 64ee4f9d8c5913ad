/// Linear two-port networks in ABCD (chain) form.
///
/// Each network is an immutable expression evaluated at one angular
/// frequency into a 2x2 complex matrix:
///
///   [V1]   [A B] [V2]
///   [I1] = [C D] [I2]
///
/// Cascading is a left-to-right matrix product in signal-path order, so
/// `cascade([x, y])` feeds x's output port into y's input port.

use std::ops::Mul;

use num_complex::Complex64;

use crate::error::{Error, Result, check_frequency};
use crate::load::{INFINITE, Load, ZERO, reciprocal};

const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// ABCD parameters of a two-port at a single frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbcdMatrix {
    m: [[Complex64; 2]; 2],
}

impl AbcdMatrix {
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { m: [[a, b], [c, d]] }
    }

    pub fn identity() -> Self {
        Self::new(ONE, ZERO, ZERO, ONE)
    }

    /// Entry at (`row`, `col`), both in 0..2.
    pub fn get(&self, row: usize, col: usize) -> Result<Complex64> {
        self.m
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .ok_or(Error::MatrixIndex { row, col })
    }

    pub fn a(&self) -> Complex64 {
        self.m[0][0]
    }

    pub fn b(&self) -> Complex64 {
        self.m[0][1]
    }

    pub fn c(&self) -> Complex64 {
        self.m[1][0]
    }

    pub fn d(&self) -> Complex64 {
        self.m[1][1]
    }

    /// AD - BC. Unity for any reciprocal network.
    pub fn determinant(&self) -> Complex64 {
        self.a() * self.d() - self.b() * self.c()
    }
}

// Entries live on the extended complex plane: an open arm is `inf` and a
// short is `0`, with 0 * inf = 0. Plain IEEE arithmetic would turn an open
// arm next to an absent element into NaN.
fn mul_ext(x: Complex64, y: Complex64) -> Complex64 {
    if x == ZERO || y == ZERO {
        ZERO
    } else if x.is_infinite() || y.is_infinite() {
        INFINITE
    } else {
        x * y
    }
}

fn add_ext(x: Complex64, y: Complex64) -> Complex64 {
    if x.is_infinite() || y.is_infinite() {
        INFINITE
    } else {
        x + y
    }
}

impl Mul for AbcdMatrix {
    type Output = AbcdMatrix;

    fn mul(self, rhs: AbcdMatrix) -> AbcdMatrix {
        let (l, r) = (&self.m, &rhs.m);
        let dot = |row: usize, col: usize| {
            add_ext(
                mul_ext(l[row][0], r[0][col]),
                mul_ext(l[row][1], r[1][col]),
            )
        };
        AbcdMatrix {
            m: [[dot(0, 0), dot(0, 1)], [dot(1, 0), dot(1, 1)]],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum NetworkKind {
    Series(Load),
    Shunt(Load),
    Transformer(f64),
    Cascade(Vec<TwoPortNetwork>),
}

/// A two-port whose ABCD matrix is a function of angular frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPortNetwork {
    kind: NetworkKind,
}

impl TwoPortNetwork {
    /// Load inserted in the series arm: [[1, Z], [0, 1]].
    pub fn series(load: Load) -> Self {
        Self { kind: NetworkKind::Series(load) }
    }

    /// Load shunted across the port: [[1, 0], [Y, 1]].
    pub fn shunt(load: Load) -> Self {
        Self { kind: NetworkKind::Shunt(load) }
    }

    /// Series element followed by a shunt element.
    pub fn l_section(series_load: Load, shunt_load: Load) -> Self {
        Self::cascade([Self::series(series_load), Self::shunt(shunt_load)])
    }

    /// L-section whose arms are each a parallel LC tank.
    pub fn cauer_l_section(
        series_inductance: f64,
        series_capacitance: f64,
        shunt_inductance: f64,
        shunt_capacitance: f64,
    ) -> Result<Self> {
        let series_arm = Load::parallel([
            Load::inductor(series_inductance)?,
            Load::capacitor(series_capacitance)?,
        ]);
        let shunt_arm = Load::parallel([
            Load::inductor(shunt_inductance)?,
            Load::capacitor(shunt_capacitance)?,
        ]);
        Ok(Self::l_section(series_arm, shunt_arm))
    }

    /// Ideal transformer with turns ratio `ratio`: [[n, 0], [0, 1/n]].
    pub fn transformer(ratio: f64) -> Result<Self> {
        if ratio > 0.0 {
            Ok(Self { kind: NetworkKind::Transformer(ratio) })
        } else {
            Err(Error::InvalidTransformerRatio(ratio))
        }
    }

    /// Through connection, a 1:1 transformer.
    pub fn identity() -> Self {
        Self { kind: NetworkKind::Transformer(1.0) }
    }

    /// Chain networks in signal-path order. An empty chain is the identity.
    pub fn cascade(networks: impl IntoIterator<Item = TwoPortNetwork>) -> Self {
        Self { kind: NetworkKind::Cascade(networks.into_iter().collect()) }
    }

    /// ABCD matrix at angular frequency `omega` (rad/s).
    pub fn matrix(&self, omega: f64) -> Result<AbcdMatrix> {
        check_frequency(omega)?;
        Ok(self.matrix_at(omega))
    }

    /// Open-circuit voltage transfer ratio 1/A.
    ///
    /// A resonant A = 0 yields `inf + 0j`, not an error.
    pub fn voltage_gain(&self, omega: f64) -> Result<Complex64> {
        check_frequency(omega)?;
        Ok(self.voltage_gain_at(omega))
    }

    /// Voltage gain magnitude in dB.
    pub fn voltage_gain_db(&self, omega: f64) -> Result<f64> {
        Ok(20.0 * self.voltage_gain(omega)?.norm().log10())
    }

    pub(crate) fn matrix_at(&self, omega: f64) -> AbcdMatrix {
        match &self.kind {
            NetworkKind::Series(load) => AbcdMatrix::new(ONE, load.impedance_at(omega), ZERO, ONE),
            NetworkKind::Shunt(load) => AbcdMatrix::new(ONE, ZERO, load.admittance_at(omega), ONE),
            NetworkKind::Transformer(n) => AbcdMatrix::new(
                Complex64::new(*n, 0.0),
                ZERO,
                ZERO,
                Complex64::new(1.0 / n, 0.0),
            ),
            NetworkKind::Cascade(networks) => networks
                .iter()
                .fold(AbcdMatrix::identity(), |acc, n| acc * n.matrix_at(omega)),
        }
    }

    pub(crate) fn voltage_gain_at(&self, omega: f64) -> Complex64 {
        reciprocal(self.matrix_at(omega).a())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn r(ohms: f64) -> Load {
        Load::resistor(ohms).unwrap()
    }

    fn assert_matrix_close(x: &AbcdMatrix, y: &AbcdMatrix) {
        for row in 0..2 {
            for col in 0..2 {
                let (p, q) = (x.get(row, col).unwrap(), y.get(row, col).unwrap());
                assert!(
                    (p - q).norm() < 1e-9 * (1.0 + q.norm()),
                    "entry ({row},{col}) differs: {p} vs {q}"
                );
            }
        }
    }

    #[test]
    fn test_empty_cascade_is_identity() {
        let empty = TwoPortNetwork::cascade([]);
        for omega in [0.0, 1.0, 1e6] {
            assert_eq!(empty.voltage_gain(omega).unwrap(), ONE);
            assert_eq!(empty.matrix(omega).unwrap(), AbcdMatrix::identity());
        }
        assert_eq!(TwoPortNetwork::identity().voltage_gain(5.0).unwrap(), ONE);
    }

    #[test]
    fn test_transformer_gain() {
        let t = TwoPortNetwork::transformer(2.0).unwrap();
        assert_eq!(t.voltage_gain(69.0).unwrap(), Complex64::new(0.5, 0.0));
        assert_eq!(t.matrix(1.0).unwrap().determinant(), ONE);
    }

    #[test]
    fn test_transformer_rejects_bad_ratio() {
        assert_eq!(
            TwoPortNetwork::transformer(0.0),
            Err(Error::InvalidTransformerRatio(0.0))
        );
        assert!(TwoPortNetwork::transformer(-3.0).is_err());
        assert!(TwoPortNetwork::transformer(f64::NAN).is_err());
    }

    #[test]
    fn test_rc_lowpass_l_section() {
        // 1/(1 + jω) at ω = 1
        let net = TwoPortNetwork::l_section(r(1.0), Load::capacitor(1.0).unwrap());
        let g = net.voltage_gain(1.0).unwrap();
        assert_relative_eq!(g.re, 0.5, epsilon = 1e-12);
        assert_relative_eq!(g.im, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_resistive_divider() {
        // 3 Ω series into 1 Ω shunt: gain 1/4
        let net = TwoPortNetwork::cascade([
            TwoPortNetwork::series(r(3.0)),
            TwoPortNetwork::shunt(r(1.0)),
        ]);
        assert_relative_eq!(net.voltage_gain(10.0).unwrap().re, 0.25, epsilon = 1e-12);
        assert_relative_eq!(net.voltage_gain_db(10.0).unwrap(), -12.0412, epsilon = 1e-4);
    }

    #[test]
    fn test_cascade_order_matters() {
        let a = TwoPortNetwork::series(r(3.0));
        let b = TwoPortNetwork::shunt(r(1.0));
        let ab = TwoPortNetwork::cascade([a.clone(), b.clone()]).matrix(1.0).unwrap();
        let ba = TwoPortNetwork::cascade([b, a]).matrix(1.0).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_cascade_is_associative() {
        let x = TwoPortNetwork::series(Load::inductor(1e-3).unwrap());
        let y = TwoPortNetwork::shunt(Load::capacitor(1e-6).unwrap());
        let z = TwoPortNetwork::transformer(1.5).unwrap();
        let left = TwoPortNetwork::cascade([
            TwoPortNetwork::cascade([x.clone(), y.clone()]),
            z.clone(),
        ]);
        let right = TwoPortNetwork::cascade([x, TwoPortNetwork::cascade([y, z])]);
        for omega in [10.0, 1e3, 3.3e4] {
            assert_matrix_close(&left.matrix(omega).unwrap(), &right.matrix(omega).unwrap());
        }
    }

    #[test]
    fn test_series_resonance_gives_infinite_gain() {
        // Shunt element ahead of nothing: A = 1 + Z*Y. Pick Z*Y = -1 exactly.
        let net = TwoPortNetwork::l_section(
            Load::inductor(1.0).unwrap(),
            Load::capacitor(1.0).unwrap(),
        );
        let g = net.voltage_gain(1.0).unwrap();
        assert!(g.re.is_infinite(), "gain at resonance should be inf, got {g}");
    }

    #[test]
    fn test_cauer_section_matches_manual_build() {
        let cauer = TwoPortNetwork::cauer_l_section(1e-3, 1e-9, 2e-3, 4.7e-9).unwrap();
        let manual = TwoPortNetwork::l_section(
            Load::parallel([Load::inductor(1e-3).unwrap(), Load::capacitor(1e-9).unwrap()]),
            Load::parallel([Load::inductor(2e-3).unwrap(), Load::capacitor(4.7e-9).unwrap()]),
        );
        assert_eq!(cauer.matrix(1e5).unwrap(), manual.matrix(1e5).unwrap());
        assert!(TwoPortNetwork::cauer_l_section(-1.0, 1e-9, 1e-3, 1e-9).is_err());
    }

    #[test]
    fn test_matrix_index_bounds() {
        let m = AbcdMatrix::identity();
        assert_eq!(m.get(1, 1).unwrap(), ONE);
        assert_eq!(m.get(2, 0), Err(Error::MatrixIndex { row: 2, col: 0 }));
        assert!(m.get(0, 5).is_err());
    }

    #[test]
    fn test_reciprocal_ladder_has_unit_determinant() {
        let net = TwoPortNetwork::cascade([
            TwoPortNetwork::series(Load::inductor(2.2e-6).unwrap()),
            TwoPortNetwork::shunt(Load::capacitor(1e-9).unwrap()),
            TwoPortNetwork::series(r(50.0)),
        ]);
        let det = net.matrix(1e7).unwrap().determinant();
        assert_relative_eq!(det.re, 1.0, epsilon = 1e-9);
        assert_relative_eq!(det.im, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_open_and_short_arms() {
        // Open series arm into an open output: no current, full voltage.
        let open = TwoPortNetwork::series(Load::capacitor(0.0).unwrap());
        assert_eq!(open.voltage_gain(1.0).unwrap(), ONE);

        // Open series arm into a resistive load: nothing gets through.
        let blocked = TwoPortNetwork::l_section(Load::capacitor(0.0).unwrap(), r(50.0));
        assert_eq!(blocked.voltage_gain(1.0).unwrap(), ZERO);

        // Shorted output.
        let shorted = TwoPortNetwork::l_section(r(50.0), r(0.0));
        assert_eq!(shorted.voltage_gain(1.0).unwrap(), ZERO);
    }

    #[test]
    fn test_negative_frequency_rejected() {
        let net = TwoPortNetwork::identity();
        assert!(net.matrix(-1.0).is_err());
        assert!(net.voltage_gain(-1.0).is_err());
    }
}
