//! Linear (automatic control system) view of inventory as an integrator.
//!
//! Inventory accumulates the net flow, so the open-loop plant is a pure
//! integrator with optional transport delay: `G(s) = K·e^{−sτ} / s`.

use crate::errors::{validate_finite, validate_parameter, ChaosResult};
use num_complex::Complex64;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integrator plant `K·e^{−sτ} / s`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegratorTransferFunction {
    gain: f64,
    delay: f64,
}

impl Default for IntegratorTransferFunction {
    fn default() -> Self {
        Self {
            gain: 1.0,
            delay: 0.0,
        }
    }
}

impl IntegratorTransferFunction {
    /// Build the plant.
    ///
    /// # Errors
    /// `NumericalError` for a non-finite gain, `InvalidParameter` for a
    /// negative or NaN delay.
    pub fn new(gain: f64, delay: f64) -> ChaosResult<Self> {
        validate_finite(gain, "integrator_gain")?;
        validate_parameter(delay, 0.0, f64::MAX, "delay")?;
        Ok(Self { gain, delay })
    }

    /// Integrator gain K
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Transport delay τ
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Numerator polynomial coefficients of the rational part, highest power first
    pub fn numerator(&self) -> Vec<f64> {
        vec![self.gain]
    }

    /// Denominator polynomial coefficients (`s + 0`), highest power first
    pub fn denominator(&self) -> Vec<f64> {
        vec![1.0, 0.0]
    }

    /// `G(jω)`; infinite at ω = 0.
    pub fn frequency_response(&self, omega: f64) -> Complex64 {
        let delay_term = Complex64::from_polar(1.0, -omega * self.delay);
        delay_term * self.gain / Complex64::new(0.0, omega)
    }

    /// Magnitude in dB and phase in radians at ω.
    pub fn bode_point(&self, omega: f64) -> (f64, f64) {
        let response = self.frequency_response(omega);
        (20.0 * response.norm().log10(), response.arg())
    }

    /// Output at time `t` for a unit step applied at t = 0: `K·max(t − τ, 0)`
    pub fn step_response(&self, t: f64) -> f64 {
        self.gain * (t - self.delay).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_polynomials() {
        let plant = IntegratorTransferFunction::new(2.5, 0.1).unwrap();
        assert_eq!(plant.numerator(), vec![2.5]);
        assert_eq!(plant.denominator(), vec![1.0, 0.0]);
        assert!(IntegratorTransferFunction::new(1.0, -0.1).is_err());
        assert!(IntegratorTransferFunction::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_integrator_frequency_response() {
        let plant = IntegratorTransferFunction::new(2.0, 0.0).unwrap();
        let response = plant.frequency_response(4.0);
        assert_approx_eq!(response.re, 0.0, 1e-12);
        assert_approx_eq!(response.im, -0.5, 1e-12);
        assert_approx_eq!(response.norm(), 0.5, 1e-12);
        assert_approx_eq!(response.arg(), -FRAC_PI_2, 1e-12);

        // Unit gain crossover at ω = K gives 0 dB
        let (magnitude_db, _) = plant.bode_point(2.0);
        assert_approx_eq!(magnitude_db, 0.0, 1e-12);
    }

    #[test]
    fn test_delay_adds_phase_lag_only() {
        let plain = IntegratorTransferFunction::default();
        let delayed = IntegratorTransferFunction::new(1.0, 0.2).unwrap();
        let omega = 1.5;
        assert_approx_eq!(
            plain.frequency_response(omega).norm(),
            delayed.frequency_response(omega).norm(),
            1e-12
        );
        assert_approx_eq!(delayed.frequency_response(omega).arg(), -FRAC_PI_2 - 0.3, 1e-12);
    }

    #[test]
    fn test_step_response_is_delayed_ramp() {
        let plant = IntegratorTransferFunction::new(3.0, 1.0).unwrap();
        assert_eq!(plant.step_response(0.5), 0.0);
        assert_eq!(plant.step_response(1.0), 0.0);
        assert_approx_eq!(plant.step_response(3.0), 6.0, 1e-12);
    }
}
