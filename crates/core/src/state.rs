use serde::{Deserialize, Serialize};

use crate::StepIntegrable;

/// Planar state of a bicycle-model vehicle.
///
/// Positions and heading are expressed in the global frame, velocities in the
/// body frame. The field order matches the array form used by [`State::to_array`]
/// and [`State::from`]: `[x, y, yaw, vx, vy, yaw_rate]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    /// Global longitudinal position (m).
    pub x: f64,
    /// Global lateral position (m).
    pub y: f64,
    /// Heading angle (rad).
    pub yaw: f64,
    /// Body-frame longitudinal velocity (m/s).
    pub vx: f64,
    /// Body-frame lateral velocity (m/s).
    pub vy: f64,
    /// Angular velocity about the vertical axis (rad/s).
    pub yaw_rate: f64,
}

impl State {
    /// Number of scalar components in a state.
    pub const LEN: usize = 6;

    /// Creates a state at the origin, aligned with the x axis, moving forward at `speed`.
    #[must_use]
    pub fn straight(speed: f64) -> Self {
        Self {
            vx: speed,
            ..Self::default()
        }
    }

    /// Returns the state as `[x, y, yaw, vx, vy, yaw_rate]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 6] {
        [self.x, self.y, self.yaw, self.vx, self.vy, self.yaw_rate]
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Returns the largest absolute component.
    ///
    /// Returns NaN if any component is NaN.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.to_array()
            .iter()
            .map(|v| v.abs())
            .fold(0.0, |acc, v| if v.is_nan() || acc.is_nan() { f64::NAN } else { acc.max(v) })
    }

    /// Euclidean distance between the positions of two states.
    #[must_use]
    pub fn distance_to(&self, other: &State) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 6]> for State {
    fn from([x, y, yaw, vx, vy, yaw_rate]: [f64; 6]) -> Self {
        Self {
            x,
            y,
            yaw,
            vx,
            vy,
            yaw_rate,
        }
    }
}

impl From<State> for [f64; 6] {
    fn from(state: State) -> Self {
        state.to_array()
    }
}

/// Time derivative of a [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateRate {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
    pub vx: f64,
    pub vy: f64,
    pub yaw_rate: f64,
}

impl StepIntegrable<f64> for State {
    type Derivative = StateRate;

    fn step(&self, rate: StateRate, dt: f64) -> Self {
        Self {
            x: self.x + dt * rate.x,
            y: self.y + dt * rate.y,
            yaw: self.yaw + dt * rate.yaw,
            vx: self.vx + dt * rate.vx,
            vy: self.vy + dt * rate.vy,
            yaw_rate: self.yaw_rate + dt * rate.yaw_rate,
        }
    }
}
