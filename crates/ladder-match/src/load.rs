/// Passive one-port loads evaluated in the frequency domain.
///
/// A `Load` is an immutable expression tree: primitive R/L/C elements and
/// series/parallel combinations of other loads. Evaluation walks the tree at
/// one angular frequency and returns the complex impedance or admittance.
///
/// Open and short circuits are exact: a zero impedance has admittance
/// `inf + 0j` and vice versa, so a capacitor at DC is a true open circuit
/// rather than a division fault.

use num_complex::Complex64;

use crate::error::{Result, check_frequency, check_non_negative};

/// Infinite impedance/admittance sentinel.
pub(crate) const INFINITE: Complex64 = Complex64::new(f64::INFINITY, 0.0);
pub(crate) const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Reciprocal that maps exact zero to `inf` and infinity to zero.
pub(crate) fn reciprocal(z: Complex64) -> Complex64 {
    if z == ZERO {
        INFINITE
    } else if z.is_infinite() {
        ZERO
    } else {
        z.inv()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LoadKind {
    Resistor(f64),
    Capacitor(f64),
    Inductor(f64),
    Series(Vec<Load>),
    Parallel(Vec<Load>),
}

/// Passive impedance as a function of angular frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Load {
    pub(crate) kind: LoadKind,
}

impl Load {
    pub(crate) fn from_kind(kind: LoadKind) -> Self {
        Self { kind }
    }

    /// Ideal resistor, Z = R.
    pub fn resistor(ohms: f64) -> Result<Self> {
        check_non_negative("resistance", ohms)?;
        Ok(Self::from_kind(LoadKind::Resistor(ohms)))
    }

    /// Ideal capacitor, Z = 1/(jωC). C = 0 is an open circuit.
    pub fn capacitor(farads: f64) -> Result<Self> {
        check_non_negative("capacitance", farads)?;
        Ok(Self::from_kind(LoadKind::Capacitor(farads)))
    }

    /// Ideal inductor, Z = jωL. L = inf is an open circuit.
    pub fn inductor(henries: f64) -> Result<Self> {
        check_non_negative("inductance", henries)?;
        Ok(Self::from_kind(LoadKind::Inductor(henries)))
    }

    /// Series combination: impedances add. No loads is a short circuit.
    pub fn series(loads: impl IntoIterator<Item = Load>) -> Self {
        Self::from_kind(LoadKind::Series(loads.into_iter().collect()))
    }

    /// Parallel combination: admittances add. No loads is an open circuit.
    pub fn parallel(loads: impl IntoIterator<Item = Load>) -> Self {
        Self::from_kind(LoadKind::Parallel(loads.into_iter().collect()))
    }

    /// Complex impedance at angular frequency `omega` (rad/s).
    pub fn impedance(&self, omega: f64) -> Result<Complex64> {
        check_frequency(omega)?;
        Ok(self.impedance_at(omega))
    }

    /// Complex admittance at angular frequency `omega` (rad/s).
    pub fn admittance(&self, omega: f64) -> Result<Complex64> {
        check_frequency(omega)?;
        Ok(self.admittance_at(omega))
    }

    /// Unchecked impedance; `omega` already validated by the caller.
    pub(crate) fn impedance_at(&self, omega: f64) -> Complex64 {
        match &self.kind {
            LoadKind::Resistor(r) => Complex64::new(*r, 0.0),
            LoadKind::Capacitor(c) => {
                if c.is_infinite() {
                    return ZERO;
                }
                let x = omega * c;
                if x == 0.0 {
                    INFINITE
                } else {
                    Complex64::new(0.0, -1.0 / x)
                }
            }
            LoadKind::Inductor(l) => {
                if l.is_infinite() {
                    INFINITE
                } else {
                    Complex64::new(0.0, omega * l)
                }
            }
            LoadKind::Series(loads) => loads.iter().map(|l| l.impedance_at(omega)).sum(),
            LoadKind::Parallel(_) => reciprocal(self.admittance_at(omega)),
        }
    }

    /// Unchecked admittance; `omega` already validated by the caller.
    pub(crate) fn admittance_at(&self, omega: f64) -> Complex64 {
        match &self.kind {
            LoadKind::Capacitor(c) => {
                if c.is_infinite() {
                    INFINITE
                } else {
                    Complex64::new(0.0, omega * c)
                }
            }
            LoadKind::Parallel(loads) => loads.iter().map(|l| l.admittance_at(omega)).sum(),
            _ => reciprocal(self.impedance_at(omega)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resistor_is_frequency_independent() {
        let r = Load::resistor(47.0).unwrap();
        for omega in [0.0, 1.0, 1e3, 1e9] {
            assert_eq!(r.impedance(omega).unwrap(), Complex64::new(47.0, 0.0));
        }
        let short = Load::resistor(0.0).unwrap();
        assert_eq!(short.impedance(10.0).unwrap(), ZERO);
        assert_eq!(short.admittance(10.0).unwrap(), INFINITE);
    }

    #[test]
    fn test_capacitor_impedance() {
        let c = Load::capacitor(1e-6).unwrap();
        let omega = 2.0 * std::f64::consts::PI * 1000.0;
        let z = c.impedance(omega).unwrap();
        assert_eq!(z.re, 0.0);
        assert_relative_eq!(z.im, -1.0 / (omega * 1e-6), epsilon = 1e-12);
        let y = c.admittance(omega).unwrap();
        assert_relative_eq!(y.im, omega * 1e-6, epsilon = 1e-15);
    }

    #[test]
    fn test_capacitor_open_at_dc_and_zero_value() {
        let c = Load::capacitor(1e-6).unwrap();
        assert_eq!(c.impedance(0.0).unwrap(), INFINITE);
        assert_eq!(c.admittance(0.0).unwrap(), ZERO);

        let none = Load::capacitor(0.0).unwrap();
        assert!(none.impedance(1e6).unwrap().re.is_infinite());
    }

    #[test]
    fn test_inductor_impedance() {
        let l = Load::inductor(2e-3).unwrap();
        let z = l.impedance(500.0).unwrap();
        assert_eq!(z.re, 0.0);
        assert_relative_eq!(z.im, 1.0, epsilon = 1e-12);
        // Short at DC
        assert_eq!(l.admittance(0.0).unwrap(), INFINITE);
    }

    #[test]
    fn test_series_and_parallel_resistors() {
        let one = || Load::resistor(1.0).unwrap();
        for omega in [0.0, 1.0, 123.0] {
            assert_eq!(
                Load::series([one(), one()]).impedance(omega).unwrap(),
                Complex64::new(2.0, 0.0)
            );
            assert_eq!(
                Load::parallel([one(), one()]).impedance(omega).unwrap(),
                Complex64::new(0.5, 0.0)
            );
        }
    }

    #[test]
    fn test_empty_combinations_are_identities() {
        assert_eq!(Load::series([]).impedance(1.0).unwrap(), ZERO);
        assert_eq!(Load::parallel([]).admittance(1.0).unwrap(), ZERO);
        assert_eq!(Load::parallel([]).impedance(1.0).unwrap(), INFINITE);

        let r = Load::resistor(3.0).unwrap();
        let nested = Load::series([Load::series([]), r.clone()]);
        assert_eq!(nested.impedance(7.0).unwrap(), r.impedance(7.0).unwrap());
    }

    #[test]
    fn test_parallel_lc_resonance_is_open() {
        // 1 H || 1 F resonates at 1 rad/s: admittances cancel exactly.
        let tank = Load::parallel([Load::inductor(1.0).unwrap(), Load::capacitor(1.0).unwrap()]);
        assert_eq!(tank.admittance(1.0).unwrap(), ZERO);
        assert_eq!(tank.impedance(1.0).unwrap(), INFINITE);
    }

    #[test]
    fn test_rejects_invalid_arguments() {
        assert!(Load::resistor(-1.0).is_err());
        assert!(Load::capacitor(f64::NAN).is_err());
        assert!(Load::inductor(-1e-9).is_err());
        let r = Load::resistor(1.0).unwrap();
        assert!(r.impedance(-1.0).is_err());
        assert!(r.admittance(-0.5).is_err());
    }
}
