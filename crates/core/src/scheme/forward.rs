use crate::{Control, State, StateRate, StepIntegrable, VehicleParams};

/// Rate of the global pose from body-frame velocities.
///
/// Shared by both dynamic schemes, which advance the pose explicitly.
pub(super) fn pose_rate(state: &State) -> (f64, f64, f64) {
    let (sin_yaw, cos_yaw) = state.yaw.sin_cos();
    let x = state.vx * cos_yaw - state.vy * sin_yaw;
    let y = state.vy * cos_yaw + state.vx * sin_yaw;
    (x, y, state.yaw_rate)
}

/// Rate of the dynamic bicycle with a linear tire model.
///
/// Requires `vx != 0`.
fn rate(params: &VehicleParams, state: &State, control: &Control) -> StateRate {
    let m = params.mass();
    let iz = params.yaw_inertia();
    let a = params.front_axle();
    let b = params.rear_axle();
    let kf = params.front_stiffness();
    let kr = params.rear_stiffness();

    let State {
        vx, vy, yaw_rate: w, ..
    } = *state;
    let steer = control.steer;

    // Slip terms scaled by vx: front `vx * alpha_f`, rear `vx * alpha_r`.
    let front_slip = vy + a * w - steer * vx;
    let rear_slip = vy - b * w;

    let (x, y, yaw) = pose_rate(state);

    StateRate {
        x,
        y,
        yaw,
        vx: control.accel + vy * w - kf * front_slip * steer.sin() / m / vx,
        vy: (kf * front_slip + kr * rear_slip - m * vx * vx * w) / m / vx,
        yaw_rate: (a * kf * front_slip - b * kr * rear_slip) / iz / vx,
    }
}

pub(super) fn update(params: &VehicleParams, state: &State, control: &Control, dt: f64) -> State {
    state.step(rate(params, state, control), dt)
}
