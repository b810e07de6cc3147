//! Cursor over a traversal plan
//!
//! Tracks how much of a plan has been played, which nodes were visited and
//! the values emitted so far. The plan itself is passed in on every call and
//! never modified.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, instrument};

use crate::domain::{NodeId, StepAction, TraversalStep};

/// Progress of a playback through its plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Cursor before the first step
    NotStarted,
    /// At least one step played, more remaining
    InProgress,
    /// Cursor on the last step
    Complete,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::NotStarted => write!(f, "not started"),
            PlaybackState::InProgress => write!(f, "in progress"),
            PlaybackState::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playback {
    /// Index of the last played step, None before the first
    cursor: Option<usize>,
    visited: HashSet<NodeId>,
    result: Vec<i64>,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor as a signed index: -1 before the first step.
    pub fn cursor(&self) -> isize {
        self.cursor.map_or(-1, |c| c as isize)
    }

    pub fn state(&self, plan: &[TraversalStep]) -> PlaybackState {
        match self.cursor {
            None => PlaybackState::NotStarted,
            Some(c) if c + 1 >= plan.len() => PlaybackState::Complete,
            Some(_) => PlaybackState::InProgress,
        }
    }

    pub fn is_complete(&self, plan: &[TraversalStep]) -> bool {
        self.state(plan) == PlaybackState::Complete
    }

    /// Plays the next step. Returns the step played, or None if there was
    /// nothing left to play (complete, or an empty plan).
    #[instrument(level = "debug", skip_all, fields(cursor = self.cursor()))]
    pub fn advance<'p>(&mut self, plan: &'p [TraversalStep]) -> Option<&'p TraversalStep> {
        let next = self.cursor.map_or(0, |c| c + 1);
        let step = plan.get(next)?;
        self.cursor = Some(next);
        match step.action {
            StepAction::VisitRoot => {
                self.result.push(step.value);
                self.visited.insert(step.node_id.clone());
            }
        }
        debug!("advanced to {}: {}", next, step);
        Some(step)
    }

    /// Back to NotStarted, forgetting visited nodes and emitted values.
    pub fn reset(&mut self) {
        debug!("playback reset");
        self.cursor = None;
        self.visited.clear();
        self.result.clear();
    }

    pub fn visited(&self) -> &HashSet<NodeId> {
        &self.visited
    }

    pub fn is_visited(&self, id: &NodeId) -> bool {
        self.visited.contains(id)
    }

    /// Values emitted so far, in traversal order.
    pub fn result(&self) -> &[i64] {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(values: &[i64]) -> Vec<TraversalStep> {
        values
            .iter()
            .map(|&v| TraversalStep::visit(NodeId::from_value(v), v))
            .collect()
    }

    #[test]
    fn test_states_follow_cursor() {
        let plan = plan(&[1, 2]);
        let mut playback = Playback::new();
        assert_eq!(playback.state(&plan), PlaybackState::NotStarted);
        playback.advance(&plan);
        assert_eq!(playback.state(&plan), PlaybackState::InProgress);
        playback.advance(&plan);
        assert_eq!(playback.state(&plan), PlaybackState::Complete);
        assert_eq!(playback.cursor(), 1);
    }

    #[test]
    fn test_single_step_plan_completes_immediately() {
        let plan = plan(&[5]);
        let mut playback = Playback::new();
        assert_eq!(playback.advance(&plan).map(|s| s.value), Some(5));
        assert!(playback.is_complete(&plan));
    }

    #[test]
    fn test_empty_plan_stays_not_started() {
        let mut playback = Playback::new();
        assert!(playback.advance(&[]).is_none());
        assert_eq!(playback.state(&[]), PlaybackState::NotStarted);
        assert_eq!(playback.cursor(), -1);
    }
}
