use serde::{Deserialize, Serialize};
use uom::si::{
    acceleration::meter_per_second_squared,
    angle::radian,
    f64::{Acceleration, Angle, Torque},
    torque::newton_meter,
};

use crate::VehicleParams;

/// Control input applied over one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Control {
    /// Desired longitudinal acceleration (m/s²).
    pub accel: f64,
    /// Front-wheel steer angle (rad).
    pub steer: f64,
}

impl Control {
    /// Creates a control from SI values.
    #[must_use]
    pub fn new(accel: f64, steer: f64) -> Self {
        Self { accel, steer }
    }

    /// Creates a control from dimensioned quantities.
    #[must_use]
    pub fn from_quantities(accel: Acceleration, steer: Angle) -> Self {
        Self {
            accel: accel.get::<meter_per_second_squared>(),
            steer: steer.get::<radian>(),
        }
    }

    /// Creates a control from a drive torque at the wheels.
    ///
    /// The desired acceleration is `torque / mass / rolling_radius`.
    #[must_use]
    pub fn from_drive_torque(torque: Torque, steer: Angle, params: &VehicleParams) -> Self {
        let accel = torque.get::<newton_meter>() / params.mass() / params.rolling_radius();
        Self {
            accel,
            steer: steer.get::<radian>(),
        }
    }

    /// Returns the desired acceleration as a dimensioned quantity.
    #[must_use]
    pub fn accel_quantity(&self) -> Acceleration {
        Acceleration::new::<meter_per_second_squared>(self.accel)
    }

    /// Returns the steer angle as a dimensioned quantity.
    #[must_use]
    pub fn steer_quantity(&self) -> Angle {
        Angle::new::<radian>(self.steer)
    }
}

impl From<[f64; 2]> for Control {
    fn from([accel, steer]: [f64; 2]) -> Self {
        Self { accel, steer }
    }
}
