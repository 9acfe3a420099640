//! Nonlinear inventory models with temperature-dependent spoilage.
//!
//! Two autonomous ODE systems:
//!
//! - single stock: `dI/dt = −k(T)·I + inflow`
//! - stock with replenishment feedback:
//!   `dI/dt = R − D − k(T)·I`, `dR/dt = α(I* − I) − βR`
//!
//! where `k(T) = k₀·(1 + s·(T − 20))`. Both are integrated on a caller-supplied
//! time grid with a fixed-step scheme, one step per grid interval. The
//! replenishment system's fixed point and its local stability (eigenvalues of
//! the Jacobian) are available in closed form.

use crate::errors::{validate_finite, ChaosMetricsError, ChaosResult};
use nalgebra::{Matrix2, SVector, Vector2};
use num_complex::Complex64;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Temperature at which the spoilage rate equals its base value (°C)
pub const REFERENCE_TEMPERATURE: f64 = 20.0;

/// Tolerance for treating a quantity as zero in equilibrium analysis
const ZERO_TOLERANCE: f64 = 1e-8;

/// Parameters of the inventory models.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InventoryParams {
    /// Base spoilage rate k₀
    pub decay_rate: f64,
    /// Relative change of the spoilage rate per °C above the reference
    pub temperature_sensitivity: f64,
    /// Storage temperature (°C)
    pub temperature: f64,
    /// Constant inflow for the single-stock model
    pub inflow: f64,
    /// Constant demand D
    pub demand: f64,
    /// Replenishment gain α
    pub replenishment_gain: f64,
    /// Replenishment decay β
    pub replenishment_decay: f64,
    /// Inventory target I*
    pub target_inventory: f64,
}

impl Default for InventoryParams {
    fn default() -> Self {
        Self {
            decay_rate: 0.01,
            temperature_sensitivity: 0.0,
            temperature: REFERENCE_TEMPERATURE,
            inflow: 0.0,
            demand: 0.0,
            replenishment_gain: 1.0,
            replenishment_decay: 1.0,
            target_inventory: 1.0,
        }
    }
}

impl InventoryParams {
    /// Effective spoilage rate k(T) at the configured temperature
    pub fn effective_decay_rate(&self) -> f64 {
        self.decay_rate
            * (1.0 + self.temperature_sensitivity * (self.temperature - REFERENCE_TEMPERATURE))
    }

    /// Right-hand side of the single-stock model
    pub fn inventory_derivative(&self, inventory: f64) -> f64 {
        -self.effective_decay_rate() * inventory + self.inflow
    }

    /// Right-hand side of the inventory/replenishment system at `[I, R]`
    pub fn replenishment_derivative(&self, state: &Vector2<f64>) -> Vector2<f64> {
        let (inventory, replenishment) = (state[0], state[1]);
        Vector2::new(
            replenishment - self.demand - self.effective_decay_rate() * inventory,
            self.replenishment_gain * (self.target_inventory - inventory)
                - self.replenishment_decay * replenishment,
        )
    }

    /// Fixed point `(I*, R*)` of the replenishment system.
    ///
    /// # Errors
    /// `InvalidParameter` when β = 0, `NumericalError` when α/β + k(T) ≈ 0.
    pub fn equilibrium(&self) -> ChaosResult<Vector2<f64>> {
        let beta = self.replenishment_decay;
        if beta.abs() < ZERO_TOLERANCE {
            return Err(ChaosMetricsError::InvalidParameter {
                parameter: "replenishment_decay".to_string(),
                value: beta,
                constraint: "must be non-zero".to_string(),
            });
        }

        let decay = self.effective_decay_rate();
        let ratio = self.replenishment_gain / beta;
        let denominator = ratio + decay;
        if denominator.abs() < ZERO_TOLERANCE {
            return Err(ChaosMetricsError::NumericalError {
                reason: format!(
                    "equilibrium undefined: alpha/beta + decay = {:.3e}",
                    denominator
                ),
                operation: Some("inventory equilibrium".to_string()),
            });
        }

        let inventory = (ratio * self.target_inventory - self.demand) / denominator;
        Ok(Vector2::new(inventory, self.demand + decay * inventory))
    }

    /// Jacobian `[[−k(T), 1], [−α, −β]]` of the replenishment system
    pub fn jacobian(&self) -> Matrix2<f64> {
        Matrix2::new(
            -self.effective_decay_rate(),
            1.0,
            -self.replenishment_gain,
            -self.replenishment_decay,
        )
    }

    /// Classify the fixed point from the Jacobian eigenvalues.
    pub fn classify_equilibrium(&self) -> EquilibriumClassification {
        let jacobian = self.jacobian();
        let trace = jacobian.trace();
        let determinant = jacobian.determinant();

        let half_trace = trace / 2.0;
        let discriminant = half_trace * half_trace - determinant;
        let root = Complex64::new(discriminant, 0.0).sqrt();
        let eigenvalues = [
            Complex64::new(half_trace, 0.0) + root,
            Complex64::new(half_trace, 0.0) - root,
        ];

        let kind = if determinant < 0.0 {
            EquilibriumKind::Saddle
        } else if eigenvalues.iter().all(|l| l.im.abs() < ZERO_TOLERANCE) {
            EquilibriumKind::Node
        } else if eigenvalues.iter().all(|l| l.re.abs() < ZERO_TOLERANCE) {
            EquilibriumKind::Center
        } else {
            EquilibriumKind::Focus
        };

        let is_stable = match kind {
            EquilibriumKind::Center => true,
            _ => eigenvalues.iter().all(|l| l.re < 0.0),
        };

        EquilibriumClassification {
            kind,
            eigenvalues,
            is_stable,
        }
    }
}

/// Phase-portrait type of a planar fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EquilibriumKind {
    /// Real eigenvalues of opposite sign
    Saddle,
    /// Real eigenvalues of equal sign
    Node,
    /// Purely imaginary eigenvalues
    Center,
    /// Complex eigenvalues with non-zero real part
    Focus,
}

/// Stability analysis of the replenishment fixed point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumClassification {
    /// Portrait type
    pub kind: EquilibriumKind,
    /// Jacobian eigenvalues
    pub eigenvalues: [Complex64; 2],
    /// All real parts negative (centers count as stable)
    pub is_stable: bool,
}

/// Fixed-step integration scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntegrationMethod {
    /// First-order explicit Euler
    ForwardEuler,
    /// Classical fourth-order Runge–Kutta
    #[default]
    RungeKutta4,
}

/// Integrate the single-stock model, returning `I(t)` at every time in `times`.
///
/// # Errors
/// `InsufficientData` for an empty time grid, `InvalidParameter` if `times`
/// is not strictly increasing, `NumericalError` for a non-finite start.
pub fn integrate_inventory(
    initial: f64,
    times: &[f64],
    params: &InventoryParams,
    method: IntegrationMethod,
) -> ChaosResult<Vec<f64>> {
    validate_finite(initial, "initial inventory")?;
    let trajectory = integrate(
        SVector::<f64, 1>::new(initial),
        times,
        method,
        |state| SVector::<f64, 1>::new(params.inventory_derivative(state[0])),
    )?;
    Ok(trajectory.into_iter().map(|state| state[0]).collect())
}

/// Integrate the inventory/replenishment system from `[I₀, R₀]`.
///
/// Returns one state per entry of `times`, the first being the initial state.
pub fn integrate_inventory_system(
    initial: Vector2<f64>,
    times: &[f64],
    params: &InventoryParams,
    method: IntegrationMethod,
) -> ChaosResult<Vec<Vector2<f64>>> {
    validate_finite(initial[0], "initial inventory")?;
    validate_finite(initial[1], "initial replenishment")?;
    integrate(initial, times, method, |state| {
        params.replenishment_derivative(state)
    })
}

fn integrate<const N: usize, F>(
    initial: SVector<f64, N>,
    times: &[f64],
    method: IntegrationMethod,
    rhs: F,
) -> ChaosResult<Vec<SVector<f64, N>>>
where
    F: Fn(&SVector<f64, N>) -> SVector<f64, N>,
{
    validate_time_grid(times)?;

    let mut trajectory = Vec::with_capacity(times.len());
    let mut state = initial;
    trajectory.push(state);

    for step in times.windows(2) {
        let h = step[1] - step[0];
        state = match method {
            IntegrationMethod::ForwardEuler => state + rhs(&state) * h,
            IntegrationMethod::RungeKutta4 => {
                let k1 = rhs(&state);
                let k2 = rhs(&(state + k1 * (h / 2.0)));
                let k3 = rhs(&(state + k2 * (h / 2.0)));
                let k4 = rhs(&(state + k3 * h));
                state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
            }
        };
        trajectory.push(state);
    }

    Ok(trajectory)
}

fn validate_time_grid(times: &[f64]) -> ChaosResult<()> {
    if times.is_empty() {
        return Err(ChaosMetricsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    for (i, pair) in times.windows(2).enumerate() {
        if !(pair[1] > pair[0]) || !pair[1].is_finite() {
            return Err(ChaosMetricsError::InvalidParameter {
                parameter: format!("times[{}]", i + 1),
                value: pair[1],
                constraint: format!("finite and > times[{}] ({})", i, pair[0]),
            });
        }
    }
    validate_finite(times[0], "times[0]")
}
