//! Text output for `bicycle run`.

use std::io::{self, Write};

use bicycle_compare::{Report, improvement};
use bicycle_core::{Scheme, State};
use bicycle_solvers::trajectory::Status;

use crate::run::Run;

/// Final RMS errors reported per run, with their labels.
const METRICS: [(&str, fn(&Report) -> Option<f64>); 3] = [
    ("position", Report::final_position_rms),
    ("lateral velocity", Report::final_lateral_velocity_rms),
    ("yaw rate", Report::final_yaw_rate_rms),
];

/// Writes one summary row per run, then relative improvements over
/// `baseline` when reference errors are available.
pub fn write_summary<W: Write>(out: &mut W, runs: &[Run], baseline: Option<Scheme>) -> io::Result<()> {
    writeln!(
        out,
        "{:<22} {:>9} {:>6} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
        "scheme",
        "status",
        "steps",
        "x",
        "y",
        "vy",
        "yaw_rate",
        "max|state|",
        "rms_pos",
        "rms_vy",
        "rms_yaw"
    )?;

    for run in runs {
        let last = run.solution.trajectory.last();
        let peak = run
            .solution
            .trajectory
            .states()
            .iter()
            .map(State::max_abs)
            .fold(0.0, |acc: f64, v| if acc.is_nan() || v.is_nan() { f64::NAN } else { acc.max(v) });
        let [pos, vy, yaw] = METRICS.map(|(_, metric)| {
            run.report
                .as_ref()
                .and_then(metric)
                .map_or_else(|| "-".to_owned(), number)
        });

        writeln!(
            out,
            "{:<22} {:>9} {:>6} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
            run.scheme.name(),
            status_label(run),
            run.solution.steps,
            number(last.x),
            number(last.y),
            number(last.vy),
            number(last.yaw_rate),
            number(peak),
            pos,
            vy,
            yaw,
        )?;
    }

    if let Some(baseline) = baseline {
        write_improvements(out, runs, baseline)?;
    }
    Ok(())
}

fn write_improvements<W: Write>(out: &mut W, runs: &[Run], baseline: Scheme) -> io::Result<()> {
    let Some(base) = runs
        .iter()
        .find(|r| r.scheme == baseline)
        .and_then(|r| r.report.as_ref())
    else {
        return Ok(());
    };

    for run in runs.iter().filter(|r| r.scheme != baseline) {
        let Some(report) = &run.report else {
            continue;
        };
        for (label, metric) in METRICS {
            if let (Some(b), Some(c)) = (metric(base), metric(report)) {
                writeln!(
                    out,
                    "{} vs {}: {:+.1}% {label} RMS improvement",
                    run.scheme,
                    baseline,
                    100.0 * improvement(b, c)
                )?;
            }
        }
    }
    Ok(())
}

/// Writes every state of every run as CSV.
pub fn write_csv<W: Write>(out: &mut W, runs: &[Run]) -> io::Result<()> {
    writeln!(out, "scheme,step,time,x,y,yaw,vx,vy,yaw_rate")?;
    for run in runs {
        for (step, (time, s)) in run.solution.trajectory.iter().enumerate() {
            writeln!(
                out,
                "{},{step},{time},{},{},{},{},{},{}",
                run.scheme, s.x, s.y, s.yaw, s.vx, s.vy, s.yaw_rate
            )?;
        }
    }
    Ok(())
}

fn status_label(run: &Run) -> &'static str {
    match (run.solution.status, run.tripped_at) {
        (Status::Complete, _) => "complete",
        (Status::StoppedByObserver, Some(_)) => "diverged",
        (Status::StoppedByObserver, None) => "stopped",
    }
}

/// Fixed-point for ordinary magnitudes, scientific once a value blows up.
fn number(v: f64) -> String {
    if v.is_finite() && v.abs() < 1e6 {
        format!("{v:.4}")
    } else {
        format!("{v:.3e}")
    }
}
