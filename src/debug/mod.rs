//! Debug bundle writer for inspecting a training run step by step.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::data::PointSet;
use crate::error::AppError;
use crate::report::format_formula;
use crate::train::{Rates, Trainer};

/// Every n-th tick is written to the trace table.
const TRACE_EVERY: u64 = 10;

/// Upper bound for the replayed run; the TUI only exports converged models.
const TRACE_MAX_TICKS: u64 = 100_000;

/// Write a trace bundle under `./debug`.
pub fn write_trace_bundle(points: &PointSet, rates: &Rates) -> Result<PathBuf, AppError> {
    write_trace_bundle_in(Path::new("debug"), points, rates)
}

/// Replay a fresh training run over `points` and write it as markdown into `dir`.
pub fn write_trace_bundle_in(dir: &Path, points: &PointSet, rates: &Rates) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::runtime(format!("Failed to create debug dir: {e}")))?;

    let now = Local::now();
    let path = dir.join(format!(
        "dosefit_trace_n{}_{}.md",
        points.len(),
        now.format("%Y%m%d_%H%M%S%.3f")
    ));

    let mut file = File::create(&path)
        .map_err(|e| AppError::runtime(format!("Failed to create debug file: {e}")))?;
    write_trace(&mut file, points, rates, &now.to_rfc3339())
        .map_err(|e| AppError::runtime(format!("Failed to write debug trace: {e}")))?;

    log::info!("wrote trace bundle {}", path.display());
    Ok(path)
}

fn write_trace<W: Write>(out: &mut W, points: &PointSet, rates: &Rates, generated: &str) -> std::io::Result<()> {
    writeln!(out, "# dosefit training trace")?;
    writeln!(out, "- generated: {generated}")?;
    writeln!(out, "- points: {}", points.len())?;
    writeln!(
        out,
        "- rate: {} | tol: a<{} b<{} c<{}",
        rates.rate, rates.tol_a, rates.tol_b, rates.tol_c
    )?;

    writeln!(out, "\n## Points")?;
    writeln!(out, "| id | dose | response |")?;
    writeln!(out, "| - | - | - |")?;
    for p in points.points() {
        writeln!(out, "| {} | {} | {} |", p.id, p.x, p.y)?;
    }

    let mut trainer = Trainer::new(*rates);
    let start = trainer.current();
    let target = trainer.start(points.points()).unwrap_or(start);

    writeln!(out, "\n## Target")?;
    writeln!(out, "{}", format_formula(&target))?;
    writeln!(out, "- a={:.9} b={:.9} c={:.9}", target.a, target.b, target.c)?;
    writeln!(out, "- tick bound: {}", crate::train::ticks_bound(&start, &target, rates))?;

    writeln!(out, "\n## Steps")?;
    writeln!(out, "| tick | a | b | c | done |")?;
    writeln!(out, "| - | - | - | - | - |")?;
    writeln!(out, "| 0 | {:.6} | {:.6} | {:.6} | false |", start.a, start.b, start.c)?;

    let mut last = None;
    while trainer.ticks() < TRACE_MAX_TICKS {
        let Some(step) = trainer.tick() else {
            break;
        };
        let tick = trainer.ticks();
        if tick % TRACE_EVERY == 0 || step.done {
            writeln!(
                out,
                "| {tick} | {:.6} | {:.6} | {:.6} | {} |",
                step.next.a, step.next.b, step.next.c, step.done
            )?;
        }
        if step.done {
            last = Some(tick);
            break;
        }
    }

    match last {
        Some(tick) => writeln!(out, "\nConverged after {tick} ticks: {}", format_formula(&trainer.current()))?,
        None => writeln!(out, "\nStopped after {} ticks without converging.", trainer.ticks())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_for_seed_set_ends_with_convergence() {
        let mut buf = Vec::new();
        write_trace(&mut buf, &PointSet::seeded(), &Rates::default(), "now").unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("# dosefit training trace\n"));
        assert!(text.contains("| fixed-26 | 26 | 112 |"));
        assert!(text.contains("y = 0.086x² - 4.845x + 178.122"));
        assert!(text.contains("| 160 |"));
        assert!(text.contains("| 166 |"));
        assert!(text.contains("Converged after 166 ticks"));
    }

    #[test]
    fn bundle_is_written_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trace_bundle_in(dir.path(), &PointSet::seeded(), &Rates::default()).unwrap();
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("dosefit_trace_n10_"));
        assert!(name.ends_with(".md"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("## Steps"));
    }
}
