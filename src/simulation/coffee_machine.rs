//! Coffee machine brewing pipeline
//!
//! A machine walks a fixed ingredient pipeline, one timed stage at a time:
//! READY -> ROASTING -> ROASTED -> EXTRACTING -> DONE. Progress is tracked
//! across the whole pipeline so reports never go backwards between stages.

use log::debug;

use super::config::MachineConfig;

/// Where the machine is in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Ready,
    Roasting,
    Roasted,
    Extracting,
    Done,
}

impl MachineState {
    pub fn label(self) -> &'static str {
        match self {
            MachineState::Ready => "ready",
            MachineState::Roasting => "roasting",
            MachineState::Roasted => "roasted",
            MachineState::Extracting => "extracting",
            MachineState::Done => "done",
        }
    }

    /// The ingredient currently in the machine
    pub fn ingredient(self) -> &'static str {
        match self {
            MachineState::Ready | MachineState::Roasting => "beans",
            MachineState::Roasted | MachineState::Extracting => "roasted_beans",
            MachineState::Done => "coffee_extract",
        }
    }
}

/// A throttled progress report for the remote view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    pub progress: f32,
    /// Set when this report closes a stage
    pub stage_finished: Option<MachineState>,
}

/// Runtime state of one coffee machine
#[derive(Debug, Clone)]
pub struct CoffeeMachine {
    state: MachineState,
    stage_elapsed: f32,
    roast_duration: f32,
    extract_duration: f32,
    report_step: f32,
    progress: f32,
    reported_progress: f32,
}

impl CoffeeMachine {
    pub fn new(config: &MachineConfig) -> Self {
        Self {
            state: MachineState::Ready,
            stage_elapsed: 0.0,
            roast_duration: config.roast_duration.max(f32::EPSILON),
            extract_duration: config.extract_duration.max(f32::EPSILON),
            report_step: config.report_step,
            progress: 0.0,
            reported_progress: 0.0,
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    /// A stage is running; `interact` is ignored until it finishes
    pub fn is_busy(&self) -> bool {
        matches!(self.state, MachineState::Roasting | MachineState::Extracting)
    }

    /// Exact pipeline progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// The last progress value reported to the view
    pub fn reported_progress(&self) -> f32 {
        self.reported_progress
    }

    fn total_duration(&self) -> f32 {
        self.roast_duration + self.extract_duration
    }

    /// Pipeline progress at which roasting ends
    fn roast_share(&self) -> f32 {
        self.roast_duration / self.total_duration()
    }

    /// Start the next stage. Returns false when busy or when the finished
    /// drink is waiting to be picked up.
    pub fn interact(&mut self) -> bool {
        let next = match self.state {
            MachineState::Ready => MachineState::Roasting,
            MachineState::Roasted => MachineState::Extracting,
            MachineState::Roasting | MachineState::Extracting | MachineState::Done => {
                return false;
            }
        };
        debug!("Coffee machine starting {}", next.label());
        self.state = next;
        self.stage_elapsed = 0.0;
        true
    }

    /// Advance the running stage. Returns a report when progress moved at least
    /// one report step since the last report, or when a stage finished.
    pub fn update(&mut self, delta_secs: f32) -> Option<ProgressReport> {
        let (duration, start, end, finished_state) = match self.state {
            MachineState::Roasting => (
                self.roast_duration,
                0.0,
                self.roast_share(),
                MachineState::Roasted,
            ),
            MachineState::Extracting => (
                self.extract_duration,
                self.roast_share(),
                1.0,
                MachineState::Done,
            ),
            _ => return None,
        };

        self.stage_elapsed += delta_secs;
        if self.stage_elapsed >= duration {
            self.state = finished_state;
            self.stage_elapsed = 0.0;
            self.progress = end;
            self.reported_progress = end;
            debug!("Coffee machine stage finished: {}", finished_state.label());
            return Some(ProgressReport {
                progress: end,
                stage_finished: Some(finished_state),
            });
        }

        let fraction = self.stage_elapsed / duration;
        self.progress = (start + (end - start) * fraction).max(self.progress);
        if self.progress - self.reported_progress >= self.report_step {
            self.reported_progress = self.progress;
            return Some(ProgressReport {
                progress: self.progress,
                stage_finished: None,
            });
        }
        None
    }

    /// Take the finished drink, resetting the pipeline to its first ingredient.
    /// Returns false if nothing is ready.
    pub fn pick_up(&mut self) -> bool {
        if self.state != MachineState::Done {
            return false;
        }
        self.state = MachineState::Ready;
        self.stage_elapsed = 0.0;
        self.progress = 0.0;
        self.reported_progress = 0.0;
        true
    }
}
