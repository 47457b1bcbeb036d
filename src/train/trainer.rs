//! Training state machine driving the convergence animation.
//!
//! ```text
//!   Idle ──start()──▶ Running ──tick() reports done──▶ Converged
//!    ▲                  │                                 │
//!    └──────reset()─────┴─────────────reset()─────────────┘
//! ```
//!
//! The trainer never schedules itself: whoever owns the clock (the TUI event
//! loop, the CLI `train` loop, a test) calls [`Trainer::tick`] and decides
//! whether to call it again based on the returned `done` flag.
//!
//! The target lives inside the `Running`/`Converged` state, so a reset drops it
//! together with the run in one assignment.

use crate::domain::{Coefficients, DataPoint};
use crate::math::fit;
use crate::train::step::{Rates, Step, step_with};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrainingState {
    Idle,
    Running { target: Coefficients },
    Converged { target: Coefficients },
}

#[derive(Debug, Clone)]
pub struct Trainer {
    rates: Rates,
    current: Coefficients,
    state: TrainingState,
    ticks: u64,
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(Rates::default())
    }
}

impl Trainer {
    pub fn new(rates: Rates) -> Self {
        Self {
            rates,
            current: Coefficients::BASELINE,
            state: TrainingState::Idle,
            ticks: 0,
        }
    }

    /// Solve for the target and start a run from the current coefficients.
    ///
    /// Only valid from `Idle`; returns `None` (and changes nothing) otherwise.
    pub fn start(&mut self, points: &[DataPoint]) -> Option<Coefficients> {
        if self.state != TrainingState::Idle {
            log::debug!("start ignored in state {:?}", self.state);
            return None;
        }
        let target = fit(points);
        log::info!(
            "training started: n={} target=({:.6}, {:.6}, {:.6})",
            points.len(),
            target.a,
            target.b,
            target.c
        );
        self.state = TrainingState::Running { target };
        self.ticks = 0;
        Some(target)
    }

    /// Advance one tick. Returns `None` when no run is in progress.
    pub fn tick(&mut self) -> Option<Step> {
        let TrainingState::Running { target } = self.state else {
            return None;
        };

        let step = step_with(self.current, target, &self.rates);
        self.current = step.next;
        self.ticks += 1;
        log::trace!(
            "tick {}: ({:.6}, {:.6}, {:.6})",
            self.ticks,
            step.next.a,
            step.next.b,
            step.next.c
        );

        if step.done {
            self.state = TrainingState::Converged { target };
            log::info!("training converged after {} ticks", self.ticks);
        }
        Some(step)
    }

    /// Drop any run and return to the flat baseline.
    pub fn reset(&mut self) {
        if self.state != TrainingState::Idle {
            log::info!("training reset after {} ticks", self.ticks);
        }
        self.state = TrainingState::Idle;
        self.current = Coefficients::BASELINE;
        self.ticks = 0;
    }

    pub fn current(&self) -> Coefficients {
        self.current
    }

    pub fn target(&self) -> Option<Coefficients> {
        match self.state {
            TrainingState::Idle => None,
            TrainingState::Running { target } | TrainingState::Converged { target } => Some(target),
        }
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn rates(&self) -> &Rates {
        &self.rates
    }

    /// Ticks taken by the current (or last converged) run.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TrainingState::Running { .. })
    }

    pub fn is_converged(&self) -> bool {
        matches!(self.state, TrainingState::Converged { .. })
    }

    /// Points may only be edited before a run starts.
    pub fn is_editable(&self) -> bool {
        self.state == TrainingState::Idle
    }
}
