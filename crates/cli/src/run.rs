//! The `run` command.

use std::{io, path::PathBuf, thread};

use anyhow::{Context, Result, anyhow};
use bicycle_compare::{
    CompareError, ReferenceSeries, Report, compare, load_delimited, load_uniform,
};
use bicycle_core::{Control, Observer, Scheme};
use bicycle_observers::{DivergenceGuard, StepLogger};
use bicycle_solvers::trajectory::{self, Action, Event, Solution};
use tracing::{info, warn};

use crate::{
    report,
    scenario::{ReferenceConfig, ReferenceFormat, Scenario},
};

/// Logs every tenth state at `debug` level.
const LOG_STRIDE: usize = 10;

pub struct Options {
    pub scenario: PathBuf,
    pub schemes: Vec<Scheme>,
    pub dump: bool,
    pub stop_above: Option<f64>,
}

/// One scheme's result.
pub struct Run {
    pub scheme: Scheme,
    pub solution: Solution,
    /// Step at which the divergence guard tripped, if one was installed.
    pub tripped_at: Option<usize>,
    /// Comparison against the scenario's reference, if it has one.
    pub report: Option<Report>,
}

pub fn run(options: &Options) -> Result<()> {
    let (runs, baseline) = evaluate(options)?;

    let mut out = io::stdout().lock();
    report::write_summary(&mut out, &runs, baseline)?;
    if options.dump {
        report::write_csv(&mut out, &runs)?;
    }
    Ok(())
}

/// Runs the scenario and compares each run against its reference.
///
/// Returns the runs with the reference's baseline scheme, if it has one.
fn evaluate(options: &Options) -> Result<(Vec<Run>, Option<Scheme>)> {
    let scenario = Scenario::load(&options.scenario)?;
    let schemes = if options.schemes.is_empty() {
        scenario.schemes.clone()
    } else {
        options.schemes.clone()
    };

    let steps = scenario.steps();
    let controls = scenario.control.sample(scenario.step, steps);
    info!(
        scenario = %options.scenario.display(),
        dt = scenario.step,
        steps,
        schemes = schemes.len(),
        "running scenario"
    );

    let mut runs = simulate_all(&scenario, &schemes, &controls, options.stop_above)?;

    if let Some(config) = &scenario.reference {
        let reference = load_reference(config)?;
        for run in &mut runs {
            match compare(&run.solution.trajectory, &reference) {
                Ok(report) => run.report = Some(report),
                Err(CompareError::NoOverlap) => {
                    warn!(scheme = %run.scheme, "no reference samples at the trajectory's times");
                }
            }
        }
    }

    let baseline = scenario.reference.as_ref().map(|r| r.baseline);
    Ok((runs, baseline))
}

/// Integrates each scheme on its own scoped thread.
fn simulate_all(
    scenario: &Scenario,
    schemes: &[Scheme],
    controls: &[Control],
    stop_above: Option<f64>,
) -> Result<Vec<Run>> {
    thread::scope(|s| {
        let handles: Vec<_> = schemes
            .iter()
            .map(|&scheme| {
                let handle = s.spawn(move || simulate(scenario, scheme, controls, stop_above));
                (scheme, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(scheme, handle)| {
                handle
                    .join()
                    .map_err(|_| anyhow!("{scheme} worker panicked"))?
            })
            .collect()
    })
}

fn simulate(
    scenario: &Scenario,
    scheme: Scheme,
    controls: &[Control],
    stop_above: Option<f64>,
) -> Result<Run> {
    let mut logger = StepLogger::new(scheme.name()).every(LOG_STRIDE);
    let mut guard = stop_above.map(DivergenceGuard::new);

    let observer = |event: &Event| -> Option<Action> {
        Observer::<Event, Action>::observe(&mut logger, event);
        guard.as_mut().and_then(|g| g.observe(event))
    };

    let solution = trajectory::solve(
        &scenario.vehicle,
        scheme,
        scenario.initial_state(),
        controls,
        scenario.step,
        scenario.steps(),
        observer,
    )
    .with_context(|| format!("{scheme} integration failed"))?;

    Ok(Run {
        scheme,
        solution,
        tripped_at: guard.and_then(|g| g.tripped_at()),
        report: None,
    })
}

fn load_reference(config: &ReferenceConfig) -> Result<ReferenceSeries> {
    let series = match &config.format {
        ReferenceFormat::Delimited { columns } => load_delimited(&config.path, columns),
        ReferenceFormat::Uniform { layout } => load_uniform(&config.path, layout),
    }
    .with_context(|| format!("failed to load reference {}", config.path.display()))?;
    info!(samples = series.len(), path = %config.path.display(), "loaded reference");
    Ok(series.shifted(config.x_offset, config.y_offset))
}

#[cfg(test)]
mod tests {
    use std::{fmt::Write as _, fs};

    use bicycle_solvers::{integrate, trajectory::Status};

    use super::*;

    /// A fresh directory for one test's files.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bicycle-run-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn runs_every_scheme_in_order() {
        let scenario = Scenario::default();
        let controls = scenario.control.sample(scenario.step, scenario.steps());

        let runs = simulate_all(&scenario, &Scheme::ALL, &controls, None).unwrap();

        let schemes: Vec<Scheme> = runs.iter().map(|r| r.scheme).collect();
        assert_eq!(schemes, Scheme::ALL);
        assert!(runs.iter().all(|r| r.solution.trajectory.len() == 41));
        assert!(runs.iter().all(|r| r.tripped_at.is_none()));
    }

    #[test]
    fn guard_stops_diverging_scheme() {
        let scenario = Scenario::default();
        let controls = scenario.control.sample(scenario.step, scenario.steps());

        let runs = simulate_all(
            &scenario,
            &[Scheme::DynamicForward, Scheme::DynamicSemiImplicit],
            &controls,
            Some(100.0),
        )
        .unwrap();

        assert_eq!(runs[0].solution.status, Status::StoppedByObserver);
        assert!(runs[0].tripped_at.is_some());
        assert_eq!(runs[1].solution.status, Status::Complete);
    }

    #[test]
    fn zero_speed_reports_failing_scheme() {
        let scenario = Scenario {
            initial_speed: 0.0,
            ..Scenario::default()
        };
        let controls = scenario.control.sample(scenario.step, scenario.steps());

        let err = simulate_all(&scenario, &[Scheme::DynamicSemiImplicit], &controls, None)
            .map(|_| ())
            .unwrap_err();

        assert!(err.to_string().contains("dynamic_semi_implicit"));
    }

    #[test]
    fn uniform_reference_reports_velocity_errors() {
        let dir = scratch_dir("uniform");
        let scenario = Scenario::default();

        // Velocities of the semi-implicit run itself, one row per step.
        let controls = scenario.control.sample(scenario.step, scenario.steps());
        let truth = integrate(
            &scenario.vehicle,
            Scheme::DynamicSemiImplicit,
            scenario.initial_state(),
            &controls,
            scenario.step,
            scenario.steps(),
        )
        .unwrap();
        let mut rows = String::new();
        for state in truth.states() {
            writeln!(rows, "{},{}", state.vy, state.yaw_rate).unwrap();
        }
        fs::write(dir.join("simulink.csv"), rows).unwrap();
        fs::write(
            dir.join("scenario.toml"),
            "[reference]\npath = \"simulink.csv\"\n\
             format = { kind = \"uniform\", layout = { interval = 0.1, vy = { index = 0 }, yaw_rate = { index = 1 } } }\n",
        )
        .unwrap();

        let options = Options {
            scenario: dir.join("scenario.toml"),
            schemes: vec![Scheme::DynamicForward, Scheme::DynamicSemiImplicit],
            dump: false,
            stop_above: None,
        };
        let (runs, baseline) = evaluate(&options).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(baseline, Some(Scheme::DynamicForward));
        let semi = runs[1].report.as_ref().expect("semi-implicit compared");
        assert!(semi.position.is_empty());
        assert_eq!(semi.lateral_velocity.len(), 41);
        assert_eq!(semi.final_lateral_velocity_rms(), Some(0.0));
        assert_eq!(semi.final_yaw_rate_rms(), Some(0.0));
        let forward = runs[0].report.as_ref().expect("forward compared");
        assert!(forward.final_lateral_velocity_rms().unwrap() > 1.0);

        let mut out = Vec::new();
        report::write_summary(&mut out, &runs, baseline).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(
            text.contains("dynamic_semi_implicit vs dynamic_forward: +100.0% lateral velocity RMS improvement"),
            "{text}"
        );
        assert!(text.contains("yaw rate RMS improvement"), "{text}");
    }

    #[test]
    fn missing_reference_file_names_the_path() {
        let dir = scratch_dir("missing");
        fs::write(dir.join("scenario.toml"), "[reference]\npath = \"absent.csv\"\n").unwrap();

        let options = Options {
            scenario: dir.join("scenario.toml"),
            schemes: vec![Scheme::Kinematic],
            dump: false,
            stop_above: None,
        };
        let err = evaluate(&options).map(|_| ()).unwrap_err();
        fs::remove_dir_all(&dir).unwrap();

        assert!(err.to_string().contains("absent.csv"), "{err}");
    }
}
