use crate::{Control, State, VehicleParams};

use super::forward::pose_rate;

/// Semi-implicit update of the dynamic bicycle.
///
/// Pose and `vx` advance explicitly. The lateral velocity and yaw rate are
/// the closed-form solution of the lateral equations written in the next-step
/// unknowns, with the coupling terms kept at the current step. The result is
/// divided by `kf + kr - m*vx/T` and `a²kf + b²kr - Iz*vx/T` rather than by
/// `vx`; with negative stiffnesses and `vx > 0` neither can vanish.
///
/// The expressions are evaluated in a fixed order so results are
/// reproducible to the bit.
pub(super) fn update(params: &VehicleParams, state: &State, control: &Control, dt: f64) -> State {
    let m = params.mass();
    let iz = params.yaw_inertia();
    let a = params.front_axle();
    let b = params.rear_axle();
    let kf = params.front_stiffness();
    let kr = params.rear_stiffness();

    let State {
        x,
        y,
        yaw,
        vx,
        vy,
        yaw_rate: w,
    } = *state;
    let steer = control.steer;
    let t = dt;

    let (x_rate, y_rate, yaw_rate) = pose_rate(state);

    let vy_next = (-(a * kf - b * kr) * w + kf * steer * vx + m * w * vx * vx - m * vx * vy / t)
        / (kf + kr - m * vx / t);
    let w_next = (-iz * w * vx / t - (a * kf - b * kr) * vy + a * kf * steer * vx)
        / ((a * a * kf + b * b * kr) - iz * vx / t);

    State {
        x: x + t * x_rate,
        y: y + t * y_rate,
        yaw: yaw + t * yaw_rate,
        vx: vx + t * control.accel,
        vy: vy_next,
        yaw_rate: w_next,
    }
}
