use crate::common::EfficiencyConfig;
use crate::common::config::{DEFAULT_MAX_VOLTAGE_STEPS, DEFAULT_VOLTAGE_STEP};
use crate::common::constants::{BOLTZMANN, ELEMENTARY_CHARGE};
use crate::domain::{SlmeError, SlmeResult};
use serde::Serialize;

/// Ideal single-diode cell, currents in A m^-2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiodeModel {
    pub j_sc: f64,
    pub j_0: f64,
    pub temperature: f64,
}

impl DiodeModel {
    pub fn new(j_sc: f64, j_0: f64, temperature: f64) -> SlmeResult<Self> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(SlmeError::input_validation(
                "INPUT.TEMPERATURE",
                format!("cell temperature must be positive, got {temperature} K"),
            ));
        }
        for (label, value) in [("short-circuit", j_sc), ("saturation", j_0)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SlmeError::numerical(
                    "RUN.DIODE_CURRENT",
                    format!("{label} current density must be finite and non-negative, got {value} A/m^2"),
                ));
            }
        }
        Ok(Self {
            j_sc,
            j_0,
            temperature,
        })
    }

    /// `J(V) = J_sc - J_0 (exp(e V / (k T)) - 1)`.
    pub fn current(&self, voltage: f64) -> f64 {
        let thermal = ELEMENTARY_CHARGE * voltage / (BOLTZMANN * self.temperature);
        self.j_sc - self.j_0 * thermal.exp_m1()
    }

    pub fn power(&self, voltage: f64) -> f64 {
        voltage * self.current(voltage)
    }

    /// `points` evenly spaced samples on `[0, v_max]`.
    pub fn sample_curve(&self, v_max: f64, points: usize) -> SlmeResult<CurrentVoltageCurve> {
        if !v_max.is_finite() || v_max <= 0.0 || points < 2 {
            return Err(SlmeError::input_validation(
                "INPUT.IV_CURVE",
                format!("I-V curve needs a positive voltage span and at least 2 points, got v_max={v_max}, points={points}"),
            ));
        }

        let step = v_max / (points - 1) as f64;
        let voltage: Vec<f64> = (0..points).map(|index| step * index as f64).collect();
        let current = voltage.iter().map(|value| self.current(*value)).collect();
        let power = voltage.iter().map(|value| self.power(*value)).collect();
        Ok(CurrentVoltageCurve {
            voltage,
            current,
            power,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentVoltageCurve {
    pub voltage: Vec<f64>,
    pub current: Vec<f64>,
    pub power: Vec<f64>,
}

/// Fixed-step search settings for the maximum power point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageClimb {
    pub step: f64,
    pub max_steps: usize,
}

impl Default for VoltageClimb {
    fn default() -> Self {
        Self {
            step: DEFAULT_VOLTAGE_STEP,
            max_steps: DEFAULT_MAX_VOLTAGE_STEPS,
        }
    }
}

impl VoltageClimb {
    pub fn from_config(config: &EfficiencyConfig) -> Self {
        Self {
            step: config.voltage_step,
            max_steps: config.max_voltage_steps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxPowerPoint {
    pub voltage: f64,
    pub power: f64,
    pub steps: usize,
}

/// Climb from 0 V in fixed steps while the power strictly increases.
///
/// Fails once `max_steps` steps have been taken and the next step still
/// increases the power.
pub fn maximize_power(diode: &DiodeModel, climb: &VoltageClimb) -> SlmeResult<MaxPowerPoint> {
    if !climb.step.is_finite() || climb.step <= 0.0 {
        return Err(SlmeError::input_validation(
            "INPUT.VOLTAGE_STEP",
            format!("voltage step must be finite and positive, got {}", climb.step),
        ));
    }

    let mut steps = 0usize;
    let mut power = diode.power(0.0);
    loop {
        let candidate = diode.power(climb.step * (steps + 1) as f64);
        if candidate.is_nan() {
            return Err(SlmeError::numerical(
                "RUN.POWER_CLIMB",
                format!("power density became NaN after {steps} voltage steps"),
            ));
        }
        if candidate <= power {
            break;
        }
        if steps == climb.max_steps {
            return Err(SlmeError::numerical(
                "RUN.POWER_CLIMB",
                format!(
                    "power density still increasing at {:.3} V after {} steps (J_sc={:.6e}, J_0={:.6e} A/m^2)",
                    climb.step * steps as f64,
                    steps,
                    diode.j_sc,
                    diode.j_0
                ),
            ));
        }
        steps += 1;
        power = candidate;
    }

    let point = MaxPowerPoint {
        voltage: climb.step * steps as f64,
        power,
        steps,
    };
    tracing::debug!(
        voltage = point.voltage,
        power = point.power,
        steps,
        "located maximum power point"
    );
    Ok(point)
}
