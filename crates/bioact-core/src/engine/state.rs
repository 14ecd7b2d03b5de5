use std::fmt;
use thiserror::Error;

/// The stages a pipeline run passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Parsed,
    Validated,
    DescriptorsComputed,
    SubsetSelected,
    Scored,
    Exported,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Idle => Some(Stage::Parsed),
            Stage::Parsed => Some(Stage::Validated),
            Stage::Validated => Some(Stage::DescriptorsComputed),
            Stage::DescriptorsComputed => Some(Stage::SubsetSelected),
            Stage::SubsetSelected => Some(Stage::Scored),
            Stage::Scored => Some(Stage::Exported),
            Stage::Exported => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Parsed => "parsed",
            Stage::Validated => "validated",
            Stage::DescriptorsComputed => "descriptors computed",
            Stage::SubsetSelected => "subset selected",
            Stage::Scored => "scored",
            Stage::Exported => "exported",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Active(Stage),
    Failed { stage: Stage, reason: String },
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Active(Stage::Exported) | RunState::Failed { .. })
    }
}

/// Tracks one run through the stage sequence.
///
/// Transitions only move one stage forward; `Exported` and `Failed` are terminal.
#[derive(Debug, Clone)]
pub struct RunTracker {
    state: RunState,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot move from {from:?} to stage '{to}'")]
pub struct InvalidTransition {
    pub from: RunState,
    pub to: Stage,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self {
            state: RunState::Active(Stage::Idle),
        }
    }
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// The last stage reached, including for a failed run.
    pub fn stage(&self) -> Stage {
        match &self.state {
            RunState::Active(stage) | RunState::Failed { stage, .. } => *stage,
        }
    }

    pub fn advance(&mut self, to: Stage) -> Result<(), InvalidTransition> {
        match self.state {
            RunState::Active(current) if current.next() == Some(to) => {
                self.state = RunState::Active(to);
                Ok(())
            }
            _ => Err(InvalidTransition {
                from: self.state.clone(),
                to,
            }),
        }
    }

    /// Moves a non-terminal run into `Failed`. Failing a terminal run has no effect.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if let RunState::Active(stage) = self.state {
            if stage != Stage::Exported {
                self.state = RunState::Failed {
                    stage,
                    reason: reason.into(),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENCE: [Stage; 6] = [
        Stage::Parsed,
        Stage::Validated,
        Stage::DescriptorsComputed,
        Stage::SubsetSelected,
        Stage::Scored,
        Stage::Exported,
    ];

    #[test]
    fn tracker_walks_the_full_sequence() {
        let mut tracker = RunTracker::new();
        for stage in SEQUENCE {
            tracker.advance(stage).unwrap();
        }
        assert_eq!(tracker.state(), &RunState::Active(Stage::Exported));
        assert!(tracker.state().is_terminal());
    }

    #[test]
    fn tracker_rejects_skipped_stages() {
        let mut tracker = RunTracker::new();
        let err = tracker.advance(Stage::Validated).unwrap_err();
        assert_eq!(err.from, RunState::Active(Stage::Idle));
        assert_eq!(tracker.stage(), Stage::Idle);
    }

    #[test]
    fn failure_is_terminal_and_records_the_stage() {
        let mut tracker = RunTracker::new();
        tracker.advance(Stage::Parsed).unwrap();
        tracker.fail("bad row");

        assert_eq!(
            tracker.state(),
            &RunState::Failed {
                stage: Stage::Parsed,
                reason: "bad row".to_string()
            }
        );
        assert!(tracker.advance(Stage::Validated).is_err());
    }

    #[test]
    fn failing_an_exported_run_is_ignored() {
        let mut tracker = RunTracker::new();
        for stage in SEQUENCE {
            tracker.advance(stage).unwrap();
        }
        tracker.fail("late");
        assert_eq!(tracker.state(), &RunState::Active(Stage::Exported));
    }
}
