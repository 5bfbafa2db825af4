use crate::{Control, State, StateRate, StepIntegrable, VehicleParams};

/// Rate of the kinematic bicycle: no tire slip, heading follows steer geometry.
///
/// The reference point is the center of gravity, so the rear-axle term
/// `b * vx * tan(steer) / L` appears as a lateral velocity of that point.
fn rate(params: &VehicleParams, state: &State, control: &Control) -> StateRate {
    let b = params.rear_axle();
    let l = params.wheelbase();
    let tan_steer = control.steer.tan();
    let (sin_yaw, cos_yaw) = state.yaw.sin_cos();
    let vx = state.vx;

    StateRate {
        x: vx * cos_yaw - b * sin_yaw * vx * tan_steer / l,
        y: vx * sin_yaw + b * cos_yaw * vx * tan_steer / l,
        yaw: vx * tan_steer / l,
        vx: control.accel,
        vy: 0.0,
        yaw_rate: 0.0,
    }
}

pub(super) fn update(params: &VehicleParams, state: &State, control: &Control, dt: f64) -> State {
    let next = state.step(rate(params, state, control), dt);

    State {
        vy: 0.0,
        yaw_rate: 0.0,
        ..next
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn lateral_states_are_zeroed() {
        let params = VehicleParams::default();
        let state = State::from([0.0, 0.0, 0.0, 8.0, 0.7, -0.3]);

        let next = update(&params, &state, &Control::new(0.5, 0.1), 0.1);

        assert_eq!(next.vy, 0.0);
        assert_eq!(next.yaw_rate, 0.0);
        assert_relative_eq!(next.vx, 8.05);
    }

    #[test]
    fn single_step_matches_geometry() {
        let params = VehicleParams::default();
        let steer: f64 = 0.2674;
        let state = State::straight(8.0);

        let next = update(&params, &state, &Control::new(0.0, steer), 0.1);

        let yaw_rate = 8.0 * steer.tan() / 2.91;
        assert_relative_eq!(next.x, 0.8);
        assert_relative_eq!(next.y, 0.1 * 1.85 * yaw_rate, epsilon = 1e-12);
        assert_relative_eq!(next.yaw, 0.1 * yaw_rate, epsilon = 1e-12);
    }
}
