use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::Control;

/// Open-loop control sequence generator.
///
/// A profile expands into one [`Control`] per integration step; sample `i`
/// is evaluated at time `i * dt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlProfile {
    /// Constant acceleration and steer angle from time zero.
    Step { accel: f64, steer: f64 },

    /// Constant acceleration with a sinusoidal steer angle,
    /// `steer(t) = amplitude * sin(π * frequency * t)`.
    Sine {
        accel: f64,
        amplitude: f64,
        frequency: f64,
    },
}

impl Default for ControlProfile {
    /// A 0.2674 rad steer step at constant speed.
    fn default() -> Self {
        ControlProfile::Step {
            accel: 0.0,
            steer: 0.2674,
        }
    }
}

impl ControlProfile {
    /// Returns the control at time `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> Control {
        match *self {
            ControlProfile::Step { accel, steer } => Control::new(accel, steer),
            ControlProfile::Sine {
                accel,
                amplitude,
                frequency,
            } => Control::new(accel, amplitude * (PI * frequency * t).sin()),
        }
    }

    /// Samples `steps` controls at a fixed step size.
    #[must_use]
    pub fn sample(&self, dt: f64, steps: usize) -> Vec<Control> {
        (0..steps).map(|i| self.at(i as f64 * dt)).collect()
    }
}
