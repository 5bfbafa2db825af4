//! Scenario files.
//!
//! A scenario bundles everything one `bicycle run` needs. Every field has a
//! default, so an empty file reproduces the reference steering maneuver:
//! an 8 m/s straight start, a constant 0.2674 rad steer, `T = 0.1` over 4 s.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use bicycle_compare::{ColumnMap, UniformLayout};
use bicycle_core::{ControlProfile, Scheme, State, VehicleParams};
use serde::{Deserialize, Serialize};

/// CarSim reports positions at a point 1.058 m ahead of the center of gravity.
const CARSIM_X_OFFSET: f64 = 1.058;

/// Largest step count a scenario may request.
pub const MAX_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Step size `T` (s).
    pub step: f64,
    /// Prediction horizon (s), used when `steps` is absent.
    pub horizon: f64,
    pub steps: Option<usize>,
    /// Longitudinal speed of the straight starting state (m/s).
    pub initial_speed: f64,
    pub schemes: Vec<Scheme>,
    pub vehicle: VehicleParams,
    pub control: ControlProfile,
    /// Full starting state; overrides `initial_speed`.
    pub initial: Option<State>,
    pub reference: Option<ReferenceConfig>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            step: 0.1,
            horizon: 4.0,
            steps: None,
            initial_speed: 8.0,
            schemes: Scheme::ALL.to_vec(),
            vehicle: VehicleParams::default(),
            control: ControlProfile::default(),
            initial: None,
            reference: None,
        }
    }
}

/// A delimited reference file and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Relative paths are resolved against the scenario file's directory.
    pub path: PathBuf,
    #[serde(default)]
    pub format: ReferenceFormat,
    #[serde(default = "carsim_x_offset")]
    pub x_offset: f64,
    #[serde(default)]
    pub y_offset: f64,
    /// Scheme the others are measured against.
    #[serde(default = "forward_baseline")]
    pub baseline: Scheme,
}

/// Layout of a reference file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceFormat {
    /// One timed row per sample; CarSim columns unless given.
    Delimited {
        #[serde(default = "ColumnMap::carsim")]
        columns: ColumnMap,
    },
    /// Velocities at a fixed interval with no time column; Simulink layout
    /// unless given.
    Uniform {
        #[serde(default = "UniformLayout::simulink")]
        layout: UniformLayout,
    },
}

impl Default for ReferenceFormat {
    fn default() -> Self {
        ReferenceFormat::Delimited {
            columns: ColumnMap::carsim(),
        }
    }
}

fn carsim_x_offset() -> f64 {
    CARSIM_X_OFFSET
}

fn forward_baseline() -> Scheme {
    Scheme::DynamicForward
}

impl Scenario {
    /// Reads, parses, and validates a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        let mut scenario = Self::parse(&text)
            .with_context(|| format!("invalid scenario {}", path.display()))?;

        if let Some(reference) = scenario.reference.as_mut() {
            if reference.path.is_relative() {
                if let Some(dir) = path.parent() {
                    reference.path = dir.join(&reference.path);
                }
            }
        }

        Ok(scenario)
    }

    /// Parses and validates scenario text.
    pub fn parse(text: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.step.is_finite() && self.step > 0.0,
            "step must be finite and positive, got {}",
            self.step
        );
        match self.steps {
            Some(steps) => ensure!(
                steps <= MAX_STEPS,
                "steps must be at most {MAX_STEPS}, got {steps}"
            ),
            None => {
                ensure!(
                    self.horizon.is_finite() && self.horizon >= 0.0,
                    "horizon must be finite and non-negative, got {}",
                    self.horizon
                );
                let steps = (self.horizon / self.step).round();
                ensure!(
                    steps <= MAX_STEPS as f64,
                    "horizon {} at step {} needs {steps} steps, more than {MAX_STEPS}",
                    self.horizon,
                    self.step
                );
            }
        }
        ensure!(!self.schemes.is_empty(), "at least one scheme is required");
        Ok(())
    }

    /// Number of integration steps: `steps` if given, else `round(horizon / step)`.
    ///
    /// Validation bounds the result by [`MAX_STEPS`].
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
            .unwrap_or_else(|| (self.horizon / self.step).round() as usize)
    }

    #[must_use]
    pub fn initial_state(&self) -> State {
        self.initial
            .unwrap_or_else(|| State::straight(self.initial_speed))
    }
}

/// Prints the default scenario to stdout.
pub fn print_defaults() -> Result<()> {
    let text = toml::to_string_pretty(&Scenario::default())
        .context("failed to serialize the default scenario")?;
    print!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn empty_file_is_the_reference_maneuver() {
        let scenario = Scenario::parse("").expect("defaults are valid");

        assert_eq!(scenario, Scenario::default());
        assert_eq!(scenario.steps(), 40);
        assert_eq!(scenario.initial_state(), State::straight(8.0));
        assert_eq!(scenario.control.sample(0.1, 1)[0].steer, 0.2674);
    }

    #[test]
    fn defaults_survive_serialization() {
        let text = toml::to_string_pretty(&Scenario::default()).unwrap();

        assert_eq!(Scenario::parse(&text).unwrap(), Scenario::default());
    }

    #[test]
    fn explicit_steps_win_over_horizon() {
        let scenario = Scenario::parse("steps = 41\nhorizon = 100.0").unwrap();
        assert_eq!(scenario.steps(), 41);

        let scenario = Scenario::parse("step = 0.01").unwrap();
        assert_eq!(scenario.steps(), 400);
    }

    #[test]
    fn parses_full_scenario() {
        let text = r#"
            step = 0.05
            schemes = ["linear_backward", "dynamic_forward"]

            [vehicle]
            rolling_radius = 0.3
            mass = 1500.0
            yaw_inertia = 2000.0
            front_axle = 1.2
            rear_axle = 1.6
            front_stiffness = -100000.0
            rear_stiffness = -90000.0

            [control]
            kind = "sine"
            accel = 0.0
            amplitude = 0.3
            frequency = 1.0

            [initial]
            x = 0.0
            y = 0.0
            yaw = 0.0
            vx = 10.0
            vy = 0.0
            yaw_rate = 0.0

            [reference]
            path = "carsim.csv"
        "#;

        let scenario = Scenario::parse(text).expect("valid scenario");

        assert_eq!(scenario.schemes, [Scheme::DynamicSemiImplicit, Scheme::DynamicForward]);
        assert_relative_eq!(scenario.vehicle.wheelbase(), 2.8, epsilon = 1e-12);
        assert_eq!(scenario.initial_state().vx, 10.0);
        assert_relative_eq!(scenario.control.at(0.5).steer, 0.3, epsilon = 1e-12);

        let reference = scenario.reference.expect("reference section");
        assert_eq!(reference.format, ReferenceFormat::default());
        assert_relative_eq!(reference.x_offset, 1.058);
        assert_eq!(reference.baseline, Scheme::DynamicForward);
    }

    #[test]
    fn rejects_invalid_values() {
        for text in [
            "step = 0.0",
            "step = -0.1",
            "horizon = -1.0",
            "schemes = []",
            "schemes = [\"rk4\"]",
            "stepsize = 0.1",
            "step = 1e-300",
            "horizon = 1e300",
            "steps = 1000000000",
        ] {
            assert!(Scenario::parse(text).is_err(), "{text}");
        }
    }

    #[test]
    fn step_count_is_bounded_inclusively() {
        let scenario = Scenario::parse(&format!("steps = {MAX_STEPS}")).unwrap();
        assert_eq!(scenario.steps(), MAX_STEPS);

        let scenario = Scenario::parse("step = 0.001\nhorizon = 1000.0").unwrap();
        assert_eq!(scenario.steps(), MAX_STEPS);

        let err = Scenario::parse("step = 0.001\nhorizon = 1000.1").unwrap_err();
        assert!(err.to_string().contains("more than"), "{err}");
    }

    #[test]
    fn parses_uniform_reference() {
        let text = r#"
            [reference]
            path = "simulink.csv"
            format = { kind = "uniform" }
        "#;

        let reference = Scenario::parse(text).unwrap().reference.unwrap();

        assert_eq!(
            reference.format,
            ReferenceFormat::Uniform {
                layout: UniformLayout::simulink()
            }
        );

        let text = r#"
            [reference]
            path = "sine.tsv"

            [reference.format]
            kind = "uniform"
            layout = { interval = 0.01, vy = { index = 2 }, yaw_rate = { index = 3, scale = 0.5 }, delimiter = "\t" }
        "#;

        let reference = Scenario::parse(text).unwrap().reference.unwrap();

        let ReferenceFormat::Uniform { layout } = reference.format else {
            panic!("expected a uniform reference");
        };
        assert_eq!(layout.interval, 0.01);
        assert_eq!(layout.yaw_rate.scale, 0.5);
        assert_eq!(layout.delimiter, '\t');
        assert_eq!(layout.header_rows, 0);
    }

    #[test]
    fn rejects_invalid_vehicle() {
        let text = r#"
            [vehicle]
            rolling_radius = 0.325
            mass = 0.0
            yaw_inertia = 1536.7
            front_axle = 1.06
            rear_axle = 1.85
            front_stiffness = -128915.5
            rear_stiffness = -85943.6
        "#;

        let err = Scenario::parse(text).unwrap_err();

        assert!(format!("{err:#}").contains("mass"));
    }

    #[test]
    fn reference_path_is_relative_to_scenario() {
        let dir = std::env::temp_dir().join(format!("bicycle-scenario-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scenario.toml");
        fs::write(&path, "[reference]\npath = \"data/ref.csv\"\n").unwrap();

        let scenario = Scenario::load(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(scenario.reference.unwrap().path, dir.join("data/ref.csv"));
    }
}
