//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load points -> solve target -> residuals/quality -> (optionally) train to convergence
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::{PointSet, generate_sample};
use crate::domain::{Coefficients, DemoConfig, FitQuality, PointResidual};
use crate::error::AppError;
use crate::io::ingest::{RowError, load_points_csv};
use crate::math::fit;
use crate::report::{compute_residuals, fit_quality};
use crate::train::{Rates, Step, Trainer};

/// All computed outputs of a single `dosefit fit` run.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub points: PointSet,
    pub target: Coefficients,
    pub residuals: Vec<PointResidual>,
    pub quality: FitQuality,
    pub row_errors: Vec<RowError>,
}

/// How a synchronous training loop ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOutcome {
    pub current: Coefficients,
    pub target: Coefficients,
    pub ticks: u64,
    pub converged: bool,
}

/// Build the point set a run works on.
///
/// Source precedence: `--points` CSV, then `--random`, then the seed set.
/// `--add` points are validated and appended to whichever set was chosen.
pub fn load_points(config: &DemoConfig) -> Result<(PointSet, Vec<RowError>), AppError> {
    let (mut points, row_errors) = if let Some(path) = &config.points_csv {
        let ingested = load_points_csv(path)?;
        (ingested.points, ingested.row_errors)
    } else if let Some(count) = config.random_count {
        let sample = generate_sample(count, config.random_seed, config.random_noise)?;
        (PointSet::from_points(sample), Vec::new())
    } else {
        (PointSet::seeded(), Vec::new())
    };

    let mut rng = rand::thread_rng();
    for &(x, y) in &config.extra_points {
        points.add(x, y, &mut rng)?;
    }

    log::debug!("loaded {} points ({} rows skipped)", points.len(), row_errors.len());
    Ok((points, row_errors))
}

/// Execute the fitting pipeline and return the computed outputs.
pub fn run_fit(config: &DemoConfig) -> Result<FitRun, AppError> {
    let (points, row_errors) = load_points(config)?;
    Ok(fit_points(points, row_errors))
}

/// Solve and summarise an already-loaded point set.
pub fn fit_points(points: PointSet, row_errors: Vec<RowError>) -> FitRun {
    let target = fit(points.points());
    let residuals = compute_residuals(points.points(), &target);
    let quality = fit_quality(points.points(), &target);
    FitRun {
        points,
        target,
        residuals,
        quality,
        row_errors,
    }
}

/// Drive a fresh trainer from the baseline until it converges or `max_ticks` is hit.
///
/// `on_tick` sees every tick, in order, with its 1-based index.
pub fn run_training(
    points: &PointSet,
    rates: Rates,
    max_ticks: u64,
    mut on_tick: impl FnMut(u64, &Step),
) -> TrainOutcome {
    let mut trainer = Trainer::new(rates);
    let target = trainer.start(points.points()).unwrap_or(Coefficients::ZERO);

    let mut converged = false;
    while trainer.ticks() < max_ticks {
        let Some(step) = trainer.tick() else {
            break;
        };
        on_tick(trainer.ticks(), &step);
        if step.done {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!("training stopped after {max_ticks} steps without converging");
    }

    TrainOutcome {
        current: trainer.current(),
        target,
        ticks: trainer.ticks(),
        converged,
    }
}
