//! Transfer functions.
//!
//! Dispatch is an exhaustive match over [`PointKind`]. Each arm threads the
//! incoming state through a short pipeline of pure state operations and
//! returns the outgoing state; nothing is mutated in place.

use super::error::TransferError;
use super::interprocedural::{CallHook, NoCallInfo};
use crate::core::{Constraint, ProgramState, SymbolicValue, TrackingFilter};
use crate::syntax::{NodeId, PointKind, PrefixOperator, ProgramPoint, SymbolId, SymbolResolver};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of applying a transfer function.
#[derive(Clone, Debug, PartialEq)]
pub enum Transfer {
    /// The state after the program point
    Next(ProgramState),

    /// A refinement contradicted what was already known: no runtime execution
    /// reaches past this point along the current path.
    Unreachable,
}

impl Transfer {
    pub fn into_state(self) -> Option<ProgramState> {
        match self {
            Transfer::Next(state) => Some(state),
            Transfer::Unreachable => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Transfer::Unreachable)
    }
}

impl From<Option<ProgramState>> for Transfer {
    fn from(state: Option<ProgramState>) -> Self {
        state.map_or(Transfer::Unreachable, Transfer::Next)
    }
}

/// How `object.name` is evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberAccessMode {
    /// Pop the object, push one placeholder.
    #[default]
    Balanced,

    /// Additionally evaluate `name` as an identifier reference, leaving one
    /// extra value on the stack per access.
    Legacy,
}

/// Apply the transfer function of `point` to `state` with default options.
///
/// # Example
///
/// ```rust
/// use symflow::core::{ProgramState, TrackingFilter};
/// use symflow::syntax::{NodeId, PointKind, ProgramPoint, SymbolTable};
/// use symflow::transfer::{apply_transfer_function, NoCallInfo, Transfer};
///
/// let point = ProgramPoint::new(NodeId(1), PointKind::NumericLiteral { text: "0".into() });
/// let outcome = apply_transfer_function(
///     &point,
///     &ProgramState::new(),
///     &SymbolTable::new(),
///     &TrackingFilter::all(),
///     &NoCallInfo,
/// )
/// .unwrap();
///
/// let Transfer::Next(state) = outcome else { panic!("literal is always reachable") };
/// let top = state.peek_value().unwrap();
/// assert!(state.constraints_of(top).is_falsy());
/// ```
pub fn apply_transfer_function(
    point: &ProgramPoint,
    state: &ProgramState,
    resolver: &dyn SymbolResolver,
    should_track: &TrackingFilter,
    on_call: &dyn CallHook,
) -> Result<Transfer, TransferError> {
    Transition {
        resolver,
        tracking: should_track,
        call_hook: on_call,
        member_access: MemberAccessMode::default(),
    }
    .apply(point, state)
}

/// A configured transfer engine.
///
/// Bundles the tracking filter, the interprocedural hook and the evaluation
/// options so a walker can apply transfer functions with a single call.
#[derive(Clone)]
pub struct TransferEngine {
    pub(crate) tracking: TrackingFilter,
    pub(crate) call_hook: Arc<dyn CallHook>,
    pub(crate) member_access: MemberAccessMode,
}

impl TransferEngine {
    /// Engine tracking every symbol with no interprocedural information.
    pub fn new() -> Self {
        Self {
            tracking: TrackingFilter::all(),
            call_hook: Arc::new(NoCallInfo),
            member_access: MemberAccessMode::default(),
        }
    }

    pub fn builder() -> super::builder::TransferEngineBuilder {
        super::builder::TransferEngineBuilder::new()
    }

    pub fn member_access(&self) -> MemberAccessMode {
        self.member_access
    }

    pub fn apply(
        &self,
        point: &ProgramPoint,
        state: &ProgramState,
        resolver: &dyn SymbolResolver,
    ) -> Result<Transfer, TransferError> {
        Transition {
            resolver,
            tracking: &self.tracking,
            call_hook: self.call_hook.as_ref(),
            member_access: self.member_access,
        }
        .apply(point, state)
    }
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransferEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferEngine")
            .field("tracking", &self.tracking)
            .field("member_access", &self.member_access)
            .finish_non_exhaustive()
    }
}

/// Collaborators of one transfer step.
struct Transition<'a> {
    resolver: &'a dyn SymbolResolver,
    tracking: &'a TrackingFilter,
    call_hook: &'a dyn CallHook,
    member_access: MemberAccessMode,
}

impl Transition<'_> {
    fn apply(&self, point: &ProgramPoint, state: &ProgramState) -> Result<Transfer, TransferError> {
        trace!(
            point = %point.id,
            kind = point.kind.label(),
            depth = state.stack_depth(),
            "applying transfer function"
        );

        let next = match &point.kind {
            PointKind::BareDeclaration { name } => {
                Some(self.bind_if_tracked(state.clone(), *name, &SymbolicValue::undefined()))
            }
            PointKind::NumericLiteral { text } => Some(push_constrained(
                state,
                SymbolicValue::numeric_literal(text.as_str()),
                numeric_truthiness(text).map(truth_constraint),
            )),
            PointKind::BooleanLiteral { value } => Some(push_constrained(
                state,
                SymbolicValue::boolean_literal(),
                Some(truth_constraint(*value)),
            )),
            PointKind::Identifier => Some(self.identifier(point.id, state)),
            PointKind::Binary { .. } => Some(binary(state)),
            PointKind::Assignment { targets } => Some(self.assignment(point.id, targets, state)?),
            PointKind::CompoundAssignment { targets, .. } => {
                Some(self.compound_assignment(targets, state))
            }
            PointKind::FunctionDeclaration { name } => Some(self.function_declaration(*name, state)),
            PointKind::VariableDeclaration { name } => Some(self.variable_declaration(*name, state)),
            PointKind::Call { arguments } => self.call(point, *arguments, state),
            PointKind::ObjectLiteral { members } => Some(object_literal(*members, state)),
            PointKind::PropertyAccess { name } => Some(self.property_access(*name, state)),
            PointKind::PrefixUnary {
                operator: PrefixOperator::Not,
            } => Some(logical_not(state)),
            PointKind::PrefixUnary { .. } => Some(state.clone()),
            PointKind::PostfixUnary { operand, .. } => Some(self.postfix_unary(*operand, state)),
            PointKind::ExpressionStatement => Some(state.pop_value().1),
            PointKind::Other => Some(state.push_value(SymbolicValue::unknown())),
        };

        if next.is_none() {
            debug!(point = %point.id, kind = point.kind.label(), "path is infeasible");
        }
        Ok(next.into())
    }

    fn tracked_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.resolver
            .resolve(node)
            .filter(|symbol| self.tracking.should_track(*symbol))
    }

    fn bind_if_tracked(&self, state: ProgramState, node: NodeId, value: &SymbolicValue) -> ProgramState {
        match self.tracked_symbol(node) {
            Some(symbol) => state.bind(symbol, value.clone()),
            None => state,
        }
    }

    fn identifier(&self, node: NodeId, state: &ProgramState) -> ProgramState {
        let existing = self
            .resolver
            .resolve(node)
            .and_then(|symbol| state.value_of(symbol));

        match existing {
            Some(value) => state.push_value(value.clone()),
            None => {
                let value = SymbolicValue::unknown();
                self.bind_if_tracked(state.clone(), node, &value)
                    .push_value(value)
            }
        }
    }

    fn assignment(
        &self,
        node: NodeId,
        targets: &[NodeId],
        state: &ProgramState,
    ) -> Result<ProgramState, TransferError> {
        let (value, state) = state.pop_value();
        let value = value.ok_or(TransferError::AssignmentWithoutValue { node })?;

        let bound = targets
            .iter()
            .fold(state, |acc, target| self.bind_if_tracked(acc, *target, &value));
        Ok(bound.push_value(value))
    }

    /// The previous value and the right-hand side are left uninspected.
    fn compound_assignment(&self, targets: &[NodeId], state: &ProgramState) -> ProgramState {
        targets.iter().fold(state.clone(), |acc, target| {
            let value = SymbolicValue::unknown();
            self.bind_if_tracked(acc, *target, &value).push_value(value)
        })
    }

    fn function_declaration(&self, name: Option<NodeId>, state: &ProgramState) -> ProgramState {
        let value = SymbolicValue::executable();
        match name.and_then(|node| self.tracked_symbol(node)) {
            Some(symbol) => state.bind(symbol, value),
            None => state.push_value(value),
        }
    }

    fn variable_declaration(&self, name: NodeId, state: &ProgramState) -> ProgramState {
        let (value, state) = state.pop_value();
        let value = value.unwrap_or_else(SymbolicValue::undefined);
        self.bind_if_tracked(state, name, &value)
    }

    /// Arguments sit above the callee with the last one on top, so positions
    /// are consumed from last to first.
    fn call(&self, point: &ProgramPoint, arguments: usize, state: &ProgramState) -> Option<ProgramState> {
        let info = self.call_hook.on_call(point);

        let state = (0..arguments).rev().try_fold(state.clone(), |acc, position| {
            let acc = if info.is_parameter_invoked(position) {
                acc.constrain(Constraint::Executed)?
            } else {
                acc
            };
            Some(acc.pop_value().1)
        })?;

        let state = info.closure.iter().try_fold(state, |acc, symbol| {
            acc.constrain_symbol(*symbol, Constraint::Executed)
        })?;

        let (_callee, state) = state.constrain(Constraint::Executed)?.pop_value();
        Some(state.push_value(SymbolicValue::unknown()))
    }

    fn property_access(&self, name: NodeId, state: &ProgramState) -> ProgramState {
        let state = state.pop_value().1.push_value(SymbolicValue::unknown());
        match self.member_access {
            MemberAccessMode::Balanced => state,
            MemberAccessMode::Legacy => self.identifier(name, &state),
        }
    }

    fn postfix_unary(&self, operand: Option<NodeId>, state: &ProgramState) -> ProgramState {
        let value = SymbolicValue::unknown();
        let state = state.pop_value().1;
        let state = match operand {
            Some(node) => self.bind_if_tracked(state, node, &value),
            None => state,
        };
        state.push_value(value)
    }
}

fn truth_constraint(truthy: bool) -> Constraint {
    if truthy {
        Constraint::Truthy
    } else {
        Constraint::Falsy
    }
}

/// Push a fresh value, constrained when `constraint` is set.
fn push_constrained(
    state: &ProgramState,
    value: SymbolicValue,
    constraint: Option<Constraint>,
) -> ProgramState {
    let pushed = state.push_value(value);
    match constraint {
        // a fresh value has no constraints to contradict
        Some(constraint) => pushed.constrain(constraint).unwrap_or(pushed),
        None => pushed,
    }
}

/// Operand values are discarded; the result is not modeled.
fn binary(state: &ProgramState) -> ProgramState {
    let (_right, state) = state.pop_value();
    let (_left, state) = state.pop_value();
    state.push_value(SymbolicValue::unknown())
}

fn object_literal(members: usize, state: &ProgramState) -> ProgramState {
    (0..members)
        .fold(state.clone(), |acc, _| acc.pop_value().1)
        .push_value(SymbolicValue::object_literal())
}

fn logical_not(state: &ProgramState) -> ProgramState {
    let (operand, popped) = state.pop_value();
    let known = operand.map(|value| state.constraints_of(&value));
    let constraint = known.and_then(|set| {
        if set.is_falsy() {
            Some(Constraint::Truthy)
        } else if set.is_truthy() {
            Some(Constraint::Falsy)
        } else {
            None
        }
    });
    push_constrained(&popped, SymbolicValue::boolean_literal(), constraint)
}

/// Truthiness of a numeric literal's printed form, `None` when unparsable.
///
/// `NaN` and `Infinity` are identifiers rather than numeric literals, so their
/// text is unparsable here and stays unconstrained.
///
/// Handles separators, radix prefixes, exponents and the BigInt suffix.
pub(crate) fn numeric_truthiness(text: &str) -> Option<bool> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    let cleaned = cleaned.strip_suffix('n').unwrap_or(&cleaned);

    let radix_digits = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| cleaned.strip_prefix(prefix).map(|digits| (digits, radix)));

    match radix_digits {
        Some((digits, radix)) => {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            Some(digits.chars().any(|c| c != '0'))
        }
        None => {
            if cleaned.is_empty() || !cleaned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
                return None;
            }
            cleaned
                .parse::<f64>()
                .ok()
                .map(|number| number != 0.0)
        }
    }
}
