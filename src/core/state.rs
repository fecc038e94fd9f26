//! Persistent program state.
//!
//! A [`ProgramState`] bundles the evaluation stack, the symbol bindings and
//! the per-value constraints. Every operation returns a new state; the
//! receiver is never modified, and unchanged parts are shared between the two
//! through `im`'s persistent collections.

use super::constraint::{Constraint, ConstraintSet};
use super::value::{SymbolicValue, ValueId};
use crate::syntax::SymbolId;
use im::{HashMap, HashSet, Vector};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Abstract machine state at one program point.
///
/// Two states are equal exactly when their stacks, bindings and constraints
/// are equal; the execution walker relies on this to detect loop fixpoints.
/// Hashing agrees with equality, so states can key hash sets.
///
/// # Example
///
/// ```rust
/// use symflow::core::{Constraint, ProgramState, SymbolicValue};
///
/// let value = SymbolicValue::unknown();
/// let state = ProgramState::new();
/// let pushed = state.push_value(value.clone());
///
/// let (top, popped) = pushed.pop_value();
/// assert_eq!(top, Some(value.clone()));
/// assert_eq!(popped, state);
/// assert_eq!(pushed.stack_depth(), 1); // original unchanged
///
/// let truthy = pushed.constrain(Constraint::Truthy).unwrap();
/// assert!(truthy.constraints_of(&value).is_truthy());
/// assert!(truthy.constrain(Constraint::Falsy).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramState {
    stack: Vector<SymbolicValue>,
    bindings: HashMap<SymbolId, SymbolicValue>,
    constraints: HashMap<ValueId, ConstraintSet>,
}

impl ProgramState {
    /// The empty state used at a control-flow graph's entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `value` on top of the stack.
    pub fn push_value(&self, value: SymbolicValue) -> Self {
        let mut stack = self.stack.clone();
        stack.push_back(value);
        Self {
            stack,
            ..self.clone()
        }
    }

    /// Remove the top of the stack.
    ///
    /// An empty stack yields `(None, unchanged state)`: unsupported syntax can
    /// desynchronize the stack, and callers must degrade gracefully.
    pub fn pop_value(&self) -> (Option<SymbolicValue>, Self) {
        let mut stack = self.stack.clone();
        match stack.pop_back() {
            Some(value) => (
                Some(value),
                Self {
                    stack,
                    ..self.clone()
                },
            ),
            None => (None, self.clone()),
        }
    }

    pub fn peek_value(&self) -> Option<&SymbolicValue> {
        self.stack.back()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Stack values from bottom to top.
    pub fn stack(&self) -> impl Iterator<Item = &SymbolicValue> + '_ {
        self.stack.iter()
    }

    pub fn clear_stack(&self) -> Self {
        Self {
            stack: Vector::new(),
            ..self.clone()
        }
    }

    /// Drop constraints on values neither on the stack nor bound to a symbol.
    ///
    /// Such values can never be refined or read again, so two states that
    /// differ only in them describe the same situation.
    pub fn retain_live_constraints(&self) -> Self {
        let live: HashSet<ValueId> = self
            .stack
            .iter()
            .chain(self.bindings.values())
            .map(SymbolicValue::id)
            .collect();
        let mut constraints = self.constraints.clone();
        constraints.retain(|id, _| live.contains(id));
        Self {
            constraints,
            ..self.clone()
        }
    }

    /// Current binding of `symbol`, if one was ever observed.
    pub fn value_of(&self, symbol: SymbolId) -> Option<&SymbolicValue> {
        self.bindings.get(&symbol)
    }

    pub fn bind(&self, symbol: SymbolId, value: SymbolicValue) -> Self {
        Self {
            bindings: self.bindings.update(symbol, value),
            ..self.clone()
        }
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&SymbolId, &SymbolicValue)> + '_ {
        self.bindings.iter()
    }

    pub fn constraints_of(&self, value: &SymbolicValue) -> ConstraintSet {
        self.constraints
            .get(&value.id())
            .copied()
            .unwrap_or_default()
    }

    /// Every value that carries at least one constraint.
    pub fn constrained_values(&self) -> impl Iterator<Item = (&ValueId, &ConstraintSet)> + '_ {
        self.constraints.iter()
    }

    /// Add `constraint` to `value`; `None` when it contradicts what is known.
    pub fn constrain_value(&self, value: &SymbolicValue, constraint: Constraint) -> Option<Self> {
        let refined = self.constraints_of(value).with(constraint)?;
        Some(Self {
            constraints: self.constraints.update(value.id(), refined),
            ..self.clone()
        })
    }

    /// Constrain the value on top of the stack.
    ///
    /// With an empty stack there is nothing to refine and the state is
    /// returned unchanged.
    pub fn constrain(&self, constraint: Constraint) -> Option<Self> {
        match self.peek_value() {
            Some(top) => self.constrain_value(top, constraint),
            None => Some(self.clone()),
        }
    }

    /// Constrain the value currently bound to `symbol`.
    ///
    /// An unbound symbol has no value to refine and leaves the state unchanged.
    pub fn constrain_symbol(&self, symbol: SymbolId, constraint: Constraint) -> Option<Self> {
        match self.value_of(symbol) {
            Some(value) => self.constrain_value(value, constraint),
            None => Some(self.clone()),
        }
    }
}

impl Hash for ProgramState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stack.len().hash(state);
        for value in self.stack.iter() {
            value.hash(state);
        }
        unordered_digest(self.bindings.iter()).hash(state);
        unordered_digest(self.constraints.iter()).hash(state);
    }
}

/// Digest of a collection that ignores iteration order.
fn unordered_digest<T: Hash>(entries: impl Iterator<Item = T>) -> u64 {
    entries
        .map(|entry| {
            let mut hasher = DefaultHasher::new();
            entry.hash(&mut hasher);
            hasher.finish()
        })
        .fold(0, u64::wrapping_add)
}

impl fmt::Display for ProgramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack=[")?;
        for (i, value) in self.stack.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "] bindings={{")?;
        let mut bindings: Vec<_> = self.bindings.iter().collect();
        bindings.sort_by_key(|(symbol, _)| **symbol);
        for (i, (symbol, value)) in bindings.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", symbol, value.id())?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = ProgramState::new();

        assert_eq!(state.stack_depth(), 0);
        assert!(state.peek_value().is_none());
        assert_eq!(state.bindings().count(), 0);
        assert_eq!(state.constrained_values().count(), 0);
    }

    #[test]
    fn push_is_immutable() {
        let state = ProgramState::new();
        let pushed = state.push_value(SymbolicValue::unknown());

        assert_eq!(state.stack_depth(), 0);
        assert_eq!(pushed.stack_depth(), 1);
    }

    #[test]
    fn pop_returns_values_in_reverse_order() {
        let a = SymbolicValue::unknown();
        let b = SymbolicValue::unknown();
        let state = ProgramState::new()
            .push_value(a.clone())
            .push_value(b.clone());

        let (first, state) = state.pop_value();
        let (second, state) = state.pop_value();

        assert_eq!(first, Some(b));
        assert_eq!(second, Some(a));
        assert_eq!(state.stack_depth(), 0);
    }

    #[test]
    fn pop_on_empty_stack_is_graceful() {
        let state = ProgramState::new();
        let (value, next) = state.pop_value();

        assert!(value.is_none());
        assert_eq!(next, state);
    }

    #[test]
    fn bind_replaces_existing_binding() {
        let first = SymbolicValue::unknown();
        let second = SymbolicValue::undefined();
        let state = ProgramState::new()
            .bind(SymbolId(1), first.clone())
            .bind(SymbolId(1), second.clone());

        assert_eq!(state.value_of(SymbolId(1)), Some(&second));
        assert_eq!(state.bindings().count(), 1);
    }

    #[test]
    fn absent_binding_is_none() {
        let state = ProgramState::new();

        assert!(state.value_of(SymbolId(9)).is_none());
    }

    #[test]
    fn constrain_targets_stack_top() {
        let bottom = SymbolicValue::unknown();
        let top = SymbolicValue::unknown();
        let state = ProgramState::new()
            .push_value(bottom.clone())
            .push_value(top.clone())
            .constrain(Constraint::Falsy)
            .unwrap();

        assert!(state.constraints_of(&top).is_falsy());
        assert!(state.constraints_of(&bottom).is_empty());
    }

    #[test]
    fn contradictory_constraint_is_infeasible() {
        let state = ProgramState::new()
            .push_value(SymbolicValue::unknown())
            .constrain(Constraint::Executed)
            .unwrap();

        assert!(state.constrain(Constraint::NotExecuted).is_none());
        assert!(state.constrain(Constraint::Executed).is_some());
    }

    #[test]
    fn constrain_on_empty_stack_is_noop() {
        let state = ProgramState::new();

        assert_eq!(state.constrain(Constraint::Truthy), Some(state));
    }

    #[test]
    fn constrain_symbol_targets_bound_value() {
        let value = SymbolicValue::executable();
        let state = ProgramState::new()
            .bind(SymbolId(2), value.clone())
            .constrain_symbol(SymbolId(2), Constraint::Executed)
            .unwrap();

        assert!(state.constraints_of(&value).is_executed());
    }

    #[test]
    fn constrain_unbound_symbol_is_noop() {
        let state = ProgramState::new();

        assert_eq!(
            state.constrain_symbol(SymbolId(3), Constraint::Executed),
            Some(state)
        );
    }

    #[test]
    fn constraints_are_shared_by_identity() {
        let value = SymbolicValue::unknown();
        let state = ProgramState::new()
            .push_value(value.clone())
            .bind(SymbolId(1), value.clone())
            .constrain(Constraint::Truthy)
            .unwrap();

        let bound = state.value_of(SymbolId(1)).unwrap();
        assert!(state.constraints_of(bound).is_truthy());
    }

    #[test]
    fn equal_triples_are_equal_states() {
        let value = SymbolicValue::unknown();
        let a = ProgramState::new()
            .push_value(value.clone())
            .bind(SymbolId(1), value.clone());
        let b = ProgramState::new()
            .bind(SymbolId(1), value.clone())
            .push_value(value);

        assert_eq!(a, b);
    }

    #[test]
    fn states_with_distinct_values_differ() {
        let a = ProgramState::new().push_value(SymbolicValue::unknown());
        let b = ProgramState::new().push_value(SymbolicValue::unknown());

        assert_ne!(a, b);
    }

    #[test]
    fn clear_stack_keeps_bindings() {
        let state = ProgramState::new()
            .bind(SymbolId(1), SymbolicValue::unknown())
            .push_value(SymbolicValue::unknown())
            .clear_stack();

        assert_eq!(state.stack_depth(), 0);
        assert_eq!(state.bindings().count(), 1);
    }

    fn hash_of(state: &ProgramState) -> u64 {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equal_states_hash_equally_regardless_of_insertion_order() {
        let a = SymbolicValue::unknown();
        let b = SymbolicValue::executable();
        let first = ProgramState::new()
            .bind(SymbolId(1), a.clone())
            .bind(SymbolId(2), b.clone())
            .push_value(a.clone())
            .constrain(Constraint::Truthy)
            .unwrap();
        let second = ProgramState::new()
            .bind(SymbolId(2), b)
            .bind(SymbolId(1), a.clone())
            .push_value(a)
            .constrain(Constraint::Truthy)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(hash_of(&first), hash_of(&second));
    }

    #[test]
    fn hash_distinguishes_stack_order() {
        let a = SymbolicValue::unknown();
        let b = SymbolicValue::unknown();
        let ab = ProgramState::new().push_value(a.clone()).push_value(b.clone());
        let ba = ProgramState::new().push_value(b).push_value(a);

        assert_ne!(ab, ba);
        assert_ne!(hash_of(&ab), hash_of(&ba));
    }

    #[test]
    fn dead_constraints_are_dropped() {
        let dead = SymbolicValue::numeric_literal("0");
        let bound = SymbolicValue::unknown();
        let stacked = SymbolicValue::unknown();
        let state = ProgramState::new()
            .push_value(dead.clone())
            .constrain(Constraint::Falsy)
            .unwrap()
            .pop_value()
            .1
            .bind(SymbolId(1), bound.clone())
            .constrain_symbol(SymbolId(1), Constraint::Truthy)
            .unwrap()
            .push_value(stacked.clone())
            .constrain(Constraint::Executed)
            .unwrap();

        let pruned = state.retain_live_constraints();

        assert!(pruned.constraints_of(&dead).is_empty());
        assert!(pruned.constraints_of(&bound).is_truthy());
        assert!(pruned.constraints_of(&stacked).is_executed());
        assert_eq!(pruned.constrained_values().count(), 2);
        assert_eq!(state.constrained_values().count(), 3);
    }

    #[test]
    fn pruning_makes_equivalent_states_equal() {
        let bound = SymbolicValue::unknown();
        let base = ProgramState::new().bind(SymbolId(1), bound);
        let with_dead = base
            .push_value(SymbolicValue::numeric_literal("0"))
            .constrain(Constraint::Falsy)
            .unwrap()
            .clear_stack();

        assert_ne!(with_dead, base);
        assert_eq!(with_dead.retain_live_constraints(), base);
    }

    #[test]
    fn state_serializes_correctly() {
        let value = SymbolicValue::numeric_literal("1");
        let state = ProgramState::new()
            .push_value(value.clone())
            .bind(SymbolId(4), value)
            .constrain(Constraint::Truthy)
            .unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let deserialized: ProgramState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
