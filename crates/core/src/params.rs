use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{
    f64::{Force, Length, Mass, MomentOfInertia},
    force::newton,
    length::meter,
    mass::kilogram,
    moment_of_inertia::kilogram_square_meter,
};

/// Physical parameters of a bicycle-model vehicle.
///
/// Values are stored in SI units and validated on construction. Parameters
/// are read-only once built and are passed by reference into every state
/// update, so one value can be shared across concurrent integrations.
///
/// The default is a mid-size passenger car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVehicleParams", into = "RawVehicleParams")]
pub struct VehicleParams {
    rolling_radius: f64,
    mass: f64,
    yaw_inertia: f64,
    front_axle: f64,
    rear_axle: f64,
    front_stiffness: f64,
    rear_stiffness: f64,
}

/// Errors that can occur when validating vehicle parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParamsError {
    #[error("rolling_radius must be finite and positive")]
    RollingRadius,

    #[error("mass must be finite and positive")]
    Mass,

    #[error("yaw_inertia must be finite and positive")]
    YawInertia,

    #[error("front_axle must be finite and positive")]
    FrontAxle,

    #[error("rear_axle must be finite and positive")]
    RearAxle,

    #[error("front_stiffness must be finite and non-zero")]
    FrontStiffness,

    #[error("rear_stiffness must be finite and non-zero")]
    RearStiffness,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            rolling_radius: 0.325,
            mass: 1412.0,
            yaw_inertia: 1536.7,
            front_axle: 1.06,
            rear_axle: 1.85,
            front_stiffness: -128_915.5,
            rear_stiffness: -85_943.6,
        }
    }
}

impl VehicleParams {
    /// Creates validated parameters from SI values.
    ///
    /// Cornering stiffnesses are in N/rad and carry the sign convention of
    /// the linear tire model (negative for a force opposing the slip angle).
    ///
    /// # Errors
    ///
    /// Returns a [`ParamsError`] naming the first parameter that is not
    /// finite, not positive (geometry and inertia), or zero (stiffness).
    pub fn new(
        rolling_radius: f64,
        mass: f64,
        yaw_inertia: f64,
        front_axle: f64,
        rear_axle: f64,
        front_stiffness: f64,
        rear_stiffness: f64,
    ) -> Result<Self, ParamsError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let nonzero = |v: f64| v.is_finite() && v != 0.0;

        if !positive(rolling_radius) {
            return Err(ParamsError::RollingRadius);
        }
        if !positive(mass) {
            return Err(ParamsError::Mass);
        }
        if !positive(yaw_inertia) {
            return Err(ParamsError::YawInertia);
        }
        if !positive(front_axle) {
            return Err(ParamsError::FrontAxle);
        }
        if !positive(rear_axle) {
            return Err(ParamsError::RearAxle);
        }
        if !nonzero(front_stiffness) {
            return Err(ParamsError::FrontStiffness);
        }
        if !nonzero(rear_stiffness) {
            return Err(ParamsError::RearStiffness);
        }

        Ok(Self {
            rolling_radius,
            mass,
            yaw_inertia,
            front_axle,
            rear_axle,
            front_stiffness,
            rear_stiffness,
        })
    }

    /// Creates validated parameters from dimensioned quantities.
    ///
    /// Stiffnesses are given as force per radian; radians are dimensionless,
    /// so they are passed as a [`Force`].
    ///
    /// # Errors
    ///
    /// See [`VehicleParams::new`].
    pub fn from_quantities(
        rolling_radius: Length,
        mass: Mass,
        yaw_inertia: MomentOfInertia,
        front_axle: Length,
        rear_axle: Length,
        front_stiffness: Force,
        rear_stiffness: Force,
    ) -> Result<Self, ParamsError> {
        Self::new(
            rolling_radius.get::<meter>(),
            mass.get::<kilogram>(),
            yaw_inertia.get::<kilogram_square_meter>(),
            front_axle.get::<meter>(),
            rear_axle.get::<meter>(),
            front_stiffness.get::<newton>(),
            rear_stiffness.get::<newton>(),
        )
    }

    /// Rolling radius of the drive wheel (m).
    #[must_use]
    pub fn rolling_radius(&self) -> f64 {
        self.rolling_radius
    }

    /// Vehicle mass (kg).
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Yaw moment of inertia (kg·m²).
    #[must_use]
    pub fn yaw_inertia(&self) -> f64 {
        self.yaw_inertia
    }

    /// Distance from the center of gravity to the front axle (m).
    #[must_use]
    pub fn front_axle(&self) -> f64 {
        self.front_axle
    }

    /// Distance from the center of gravity to the rear axle (m).
    #[must_use]
    pub fn rear_axle(&self) -> f64 {
        self.rear_axle
    }

    /// Wheelbase, `front_axle + rear_axle` (m).
    #[must_use]
    pub fn wheelbase(&self) -> f64 {
        self.front_axle + self.rear_axle
    }

    /// Equivalent cornering stiffness of the front axle (N/rad).
    #[must_use]
    pub fn front_stiffness(&self) -> f64 {
        self.front_stiffness
    }

    /// Equivalent cornering stiffness of the rear axle (N/rad).
    #[must_use]
    pub fn rear_stiffness(&self) -> f64 {
        self.rear_stiffness
    }
}

/// Unvalidated mirror of [`VehicleParams`] used for (de)serialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVehicleParams {
    rolling_radius: f64,
    mass: f64,
    yaw_inertia: f64,
    front_axle: f64,
    rear_axle: f64,
    front_stiffness: f64,
    rear_stiffness: f64,
}

impl TryFrom<RawVehicleParams> for VehicleParams {
    type Error = ParamsError;

    fn try_from(raw: RawVehicleParams) -> Result<Self, Self::Error> {
        Self::new(
            raw.rolling_radius,
            raw.mass,
            raw.yaw_inertia,
            raw.front_axle,
            raw.rear_axle,
            raw.front_stiffness,
            raw.rear_stiffness,
        )
    }
}

impl From<VehicleParams> for RawVehicleParams {
    fn from(params: VehicleParams) -> Self {
        Self {
            rolling_radius: params.rolling_radius,
            mass: params.mass,
            yaw_inertia: params.yaw_inertia,
            front_axle: params.front_axle,
            rear_axle: params.rear_axle,
            front_stiffness: params.front_stiffness,
            rear_stiffness: params.rear_stiffness,
        }
    }
}
