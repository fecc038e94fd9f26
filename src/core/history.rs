//! Execution history.
//!
//! Records the outgoing program state of every visited program point, in
//! visiting order. This is the stream downstream bug-pattern checks consume.

use super::constraint::Constraint;
use super::state::ProgramState;
use crate::syntax::NodeId;
use im::Vector;
use serde::{Deserialize, Serialize};

/// The state produced at one program point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
    /// The program point that was evaluated
    pub point: NodeId,
    /// The state after evaluating it
    pub state: ProgramState,
}

/// Ordered, persistent record of execution steps.
///
/// `record` returns a new history and leaves the receiver untouched.
///
/// # Example
///
/// ```rust
/// use symflow::core::{Constraint, ExecutionHistory, ExecutionStep, ProgramState, SymbolicValue};
/// use symflow::syntax::NodeId;
///
/// let state = ProgramState::new()
///     .push_value(SymbolicValue::boolean_literal())
///     .constrain(Constraint::Truthy)
///     .unwrap();
///
/// let history = ExecutionHistory::new();
/// let recorded = history.record(ExecutionStep { point: NodeId(1), state });
///
/// assert!(history.is_empty());
/// assert_eq!(recorded.len(), 1);
/// assert!(recorded.always(NodeId(1), Constraint::Truthy));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionHistory {
    steps: Vector<ExecutionStep>,
}

impl ExecutionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step, returning a new history.
    pub fn record(&self, step: ExecutionStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push_back(step);
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExecutionStep> + '_ {
        self.steps.iter()
    }

    /// Every state recorded after `point`, in visiting order.
    pub fn states_at(&self, point: NodeId) -> impl Iterator<Item = &ProgramState> + '_ {
        self.steps
            .iter()
            .filter(move |step| step.point == point)
            .map(|step| &step.state)
    }

    pub fn was_visited(&self, point: NodeId) -> bool {
        self.states_at(point).next().is_some()
    }

    /// True when `point` was visited and, in every recorded state, the value
    /// it left on top of the stack carries `constraint`.
    pub fn always(&self, point: NodeId, constraint: Constraint) -> bool {
        let mut states = self.states_at(point).peekable();
        if states.peek().is_none() {
            return false;
        }
        states.all(|state| {
            state
                .peek_value()
                .is_some_and(|top| state.constraints_of(top).contains(constraint))
        })
    }
}
