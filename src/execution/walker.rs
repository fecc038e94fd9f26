//! Worklist walker over a control-flow graph.

use super::config::ExecutionConfig;
use super::error::ExecutionError;
use crate::cfg::{Block, BlockId, ControlFlowGraph, Terminator};
use crate::core::{Constraint, ExecutionHistory, ExecutionStep, ProgramState};
use crate::invariants::{CheckContext, InvariantRules, ViolationStrategy};
use crate::syntax::SymbolResolver;
use crate::transfer::{Transfer, TransferEngine};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use stillwater::validation::Validation;
use tracing::{debug, warn};

/// How a walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Every feasible path reached an exit or a fixpoint
    Completed,

    /// A visit or step limit cut exploration short
    LimitReached,
}

/// Everything a walk produced.
#[derive(Clone, Debug)]
pub struct ExecutionReport {
    pub outcome: ExecutionOutcome,
    pub history: ExecutionHistory,
    /// States that left the function, stacks cleared
    pub exit_states: Vec<ProgramState>,
    /// Number of times each reached block was entered
    pub visits: BTreeMap<BlockId, usize>,
    /// Edges followed by at least one feasible path
    pub edges: BTreeSet<(BlockId, BlockId)>,
}

impl ExecutionReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == ExecutionOutcome::Completed
    }

    pub fn was_reached(&self, block: BlockId) -> bool {
        self.visits.contains_key(&block)
    }

    pub fn was_taken(&self, from: BlockId, to: BlockId) -> bool {
        self.edges.contains(&(from, to))
    }
}

/// Symbolic execution of one control-flow graph.
///
/// Starts from the empty state at the entry block and feeds every block's
/// points through the engine. Branches refine the condition value per edge
/// and drop edges the refinement proves infeasible. At every block boundary
/// constraints on values that are no longer reachable are dropped, and a
/// block is not revisited with a state it has already been entered with,
/// which is what makes loops terminate; the visit and step limits bound the
/// rest.
///
/// The configuration decides how member access is evaluated; the engine's
/// own mode is replaced by `config.member_access`.
///
/// # Example
///
/// ```rust
/// use symflow::cfg::{BlockBuilder, BlockId, CfgBuilder};
/// use symflow::execution::{ExecutionConfig, SymbolicExecution};
/// use symflow::syntax::{NodeId, PointKind, ProgramPoint, SymbolTable};
/// use symflow::transfer::TransferEngine;
///
/// // if (0) { dead } else { live }
/// let cfg = CfgBuilder::new()
///     .entry(BlockId(0))
///     .block(
///         BlockBuilder::new()
///             .point(ProgramPoint::new(
///                 NodeId(1),
///                 PointKind::NumericLiteral { text: "0".into() },
///             ))
///             .branch(BlockId(1), BlockId(2)),
///     )?
///     .block(BlockBuilder::new().exit())?
///     .block(BlockBuilder::new().exit())?
///     .build()?;
///
/// let report = SymbolicExecution::new(&cfg, TransferEngine::new(), ExecutionConfig::default())
///     .execute(&SymbolTable::new())?;
///
/// assert!(!report.was_reached(BlockId(1)));
/// assert!(report.was_reached(BlockId(2)));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SymbolicExecution<'cfg> {
    cfg: &'cfg ControlFlowGraph,
    engine: TransferEngine,
    config: ExecutionConfig,
    invariants: Option<InvariantRules>,
}

impl<'cfg> SymbolicExecution<'cfg> {
    pub fn new(cfg: &'cfg ControlFlowGraph, mut engine: TransferEngine, config: ExecutionConfig) -> Self {
        engine.member_access = config.member_access;
        Self {
            cfg,
            engine,
            config,
            invariants: None,
        }
    }

    /// Check `rules` after every block.
    pub fn with_invariants(mut self, rules: InvariantRules) -> Self {
        self.invariants = Some(rules);
        self
    }

    #[tracing::instrument(skip_all, fields(blocks = self.cfg.len()))]
    pub fn execute(&self, resolver: &dyn SymbolResolver) -> Result<ExecutionReport, ExecutionError> {
        let mut worklist = VecDeque::from([(self.cfg.entry(), ProgramState::new())]);
        let mut seen: HashMap<BlockId, HashSet<ProgramState>> = HashMap::new();
        let mut visits = BTreeMap::new();
        let mut edges = BTreeSet::new();
        let mut history = ExecutionHistory::new();
        let mut exit_states = Vec::new();
        let mut outcome = ExecutionOutcome::Completed;
        let mut steps = 0usize;

        'walk: while let Some((id, entry_state)) = worklist.pop_front() {
            let Some(block) = self.cfg.block(id) else {
                continue;
            };

            let entered = seen.entry(id).or_default();
            if entered.contains(&entry_state) {
                debug!(block = %id, "fixpoint reached");
                continue;
            }
            let count = visits.entry(id).or_insert(0usize);
            if *count >= self.config.max_block_visits {
                warn!(block = %id, limit = self.config.max_block_visits, "block visit limit reached");
                outcome = ExecutionOutcome::LimitReached;
                continue;
            }
            *count += 1;
            entered.insert(entry_state.clone());
            debug!(block = %id, visit = *count, "visiting block");

            let mut state = entry_state.clone();
            for point in &block.points {
                if steps >= self.config.max_steps {
                    warn!(limit = self.config.max_steps, "step limit reached");
                    outcome = ExecutionOutcome::LimitReached;
                    break 'walk;
                }
                steps += 1;

                match self.engine.apply(point, &state, resolver)? {
                    Transfer::Next(next) => {
                        history = history.record(ExecutionStep {
                            point: point.id,
                            state: next.clone(),
                        });
                        state = next;
                    }
                    Transfer::Unreachable => continue 'walk,
                }
            }

            self.check_invariants(id, block, &entry_state, &state)?;

            match block.terminator {
                Terminator::Jump(target) => {
                    edges.insert((id, target));
                    worklist.push_back((target, state.clear_stack().retain_live_constraints()));
                }
                Terminator::Exit => {
                    exit_states.push(state.clear_stack().retain_live_constraints())
                }
                Terminator::Branch {
                    when_true,
                    when_false,
                } => {
                    let (condition, rest) = state.pop_value();
                    for (target, constraint) in
                        [(when_true, Constraint::Truthy), (when_false, Constraint::Falsy)]
                    {
                        let refined = match &condition {
                            Some(value) => rest.constrain_value(value, constraint),
                            None => Some(rest.clone()),
                        };
                        match refined {
                            Some(next) => {
                                edges.insert((id, target));
                                worklist.push_back((target, next.retain_live_constraints()));
                            }
                            None => debug!(from = %id, to = %target, "pruned infeasible edge"),
                        }
                    }
                }
            }
        }

        Ok(ExecutionReport {
            outcome,
            history,
            exit_states,
            visits,
            edges,
        })
    }

    fn check_invariants(
        &self,
        id: BlockId,
        block: &Block,
        before: &ProgramState,
        after: &ProgramState,
    ) -> Result<(), ExecutionError> {
        let Some(rules) = &self.invariants else {
            return Ok(());
        };

        // A branching block leaves its condition on the stack.
        let expected_delta = match block.terminator {
            Terminator::Branch { .. } => 1,
            _ => 0,
        };
        let context = CheckContext {
            before: before.clone(),
            after: after.clone(),
            expected_delta,
        };

        match rules.enforce(&context) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => {
                let violations: Vec<_> = errors.iter().cloned().collect();
                match rules.violation_strategy() {
                    ViolationStrategy::Abort => Err(ExecutionError::InvariantViolated {
                        block: id,
                        violations,
                    }),
                    ViolationStrategy::IgnoreAndLog => {
                        for violation in &violations {
                            warn!(block = %id, %violation, "invariant violated");
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::BlockBuilder;
    use crate::invariants::{InvariantBuilder, InvariantViolation};
    use crate::syntax::{NodeId, PointKind, ProgramPoint, SymbolId, SymbolTable};
    use crate::transfer::MemberAccessMode;

    fn point(id: u32, kind: PointKind) -> ProgramPoint {
        ProgramPoint::new(NodeId(id), kind)
    }

    fn literal(id: u32, text: &str) -> ProgramPoint {
        point(id, PointKind::NumericLiteral { text: text.into() })
    }

    fn run(cfg: &ControlFlowGraph, resolver: &SymbolTable) -> ExecutionReport {
        SymbolicExecution::new(cfg, TransferEngine::new(), ExecutionConfig::default())
            .execute(resolver)
            .unwrap()
    }

    #[test]
    fn straight_line_reaches_exit() {
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(
                BlockBuilder::new()
                    .point(literal(1, "1"))
                    .point(point(2, PointKind::ExpressionStatement))
                    .exit(),
            )
            .and_then(|b| b.build())
            .unwrap();

        let report = run(&cfg, &SymbolTable::new());

        assert!(report.is_complete());
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.exit_states.len(), 1);
        assert_eq!(report.exit_states[0].stack_depth(), 0);
        assert_eq!(report.visits.get(&BlockId(0)), Some(&1));
    }

    #[test]
    fn truthy_constant_prunes_false_edge() {
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(BlockBuilder::new().point(literal(1, "42")).branch(BlockId(1), BlockId(2)))
            .and_then(|b| b.block(BlockBuilder::new().exit()))
            .and_then(|b| b.block(BlockBuilder::new().exit()))
            .and_then(|b| b.build())
            .unwrap();

        let report = run(&cfg, &SymbolTable::new());

        assert!(report.was_taken(BlockId(0), BlockId(1)));
        assert!(!report.was_taken(BlockId(0), BlockId(2)));
        assert!(!report.was_reached(BlockId(2)));
        assert_eq!(report.exit_states.len(), 1);
    }

    #[test]
    fn unknown_condition_takes_both_edges() {
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(
                BlockBuilder::new()
                    .point(point(1, PointKind::Other))
                    .branch(BlockId(1), BlockId(2)),
            )
            .and_then(|b| b.block(BlockBuilder::new().exit()))
            .and_then(|b| b.block(BlockBuilder::new().exit()))
            .and_then(|b| b.build())
            .unwrap();

        let report = run(&cfg, &SymbolTable::new());

        assert!(report.was_reached(BlockId(1)));
        assert!(report.was_reached(BlockId(2)));
        assert_eq!(report.exit_states.len(), 2);
    }

    #[test]
    fn loop_on_stable_condition_reaches_fixpoint() {
        // while (x) {}
        let resolver = SymbolTable::new().with(NodeId(1), SymbolId(1));
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(
                BlockBuilder::new()
                    .point(point(1, PointKind::Identifier))
                    .branch(BlockId(1), BlockId(2)),
            )
            .and_then(|b| b.block(BlockBuilder::new().jump(BlockId(0))))
            .and_then(|b| b.block(BlockBuilder::new().exit()))
            .and_then(|b| b.build())
            .unwrap();

        let report = run(&cfg, &resolver);

        assert!(report.is_complete());
        assert_eq!(report.visits.get(&BlockId(0)), Some(&2));
        assert_eq!(report.exit_states.len(), 1);
    }

    #[test]
    fn dead_statement_values_do_not_block_fixpoint() {
        // while (x) { 0; }
        let resolver = SymbolTable::new().with(NodeId(1), SymbolId(1));
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(
                BlockBuilder::new()
                    .point(point(1, PointKind::Identifier))
                    .branch(BlockId(1), BlockId(2)),
            )
            .and_then(|b| {
                b.block(
                    BlockBuilder::new()
                        .point(literal(2, "0"))
                        .point(point(3, PointKind::ExpressionStatement))
                        .jump(BlockId(0)),
                )
            })
            .and_then(|b| b.block(BlockBuilder::new().exit()))
            .and_then(|b| b.build())
            .unwrap();

        let report = run(&cfg, &resolver);

        assert_eq!(report.outcome, ExecutionOutcome::Completed);
        assert_eq!(report.visits.get(&BlockId(0)), Some(&2));
        assert_eq!(report.visits.get(&BlockId(1)), Some(&1));
        assert_eq!(report.exit_states[0].constrained_values().count(), 1);
    }

    #[test]
    fn config_selects_member_access_mode() {
        // obj.name;
        let resolver = SymbolTable::new().with(NodeId(2), SymbolId(2));
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(
                BlockBuilder::new()
                    .point(point(1, PointKind::ObjectLiteral { members: 0 }))
                    .point(point(3, PointKind::PropertyAccess { name: NodeId(2) }))
                    .exit(),
            )
            .and_then(|b| b.build())
            .unwrap();

        let legacy = SymbolicExecution::new(
            &cfg,
            TransferEngine::new(),
            ExecutionConfig::new().member_access(MemberAccessMode::Legacy),
        )
        .execute(&resolver)
        .unwrap();
        let balanced = SymbolicExecution::new(
            &cfg,
            TransferEngine::builder()
                .member_access(MemberAccessMode::Legacy)
                .build(),
            ExecutionConfig::default(),
        )
        .execute(&resolver)
        .unwrap();

        let legacy_access = legacy.history.states_at(NodeId(3)).next().unwrap();
        assert_eq!(legacy_access.stack_depth(), 2);
        assert!(legacy_access.value_of(SymbolId(2)).is_some());

        let balanced_access = balanced.history.states_at(NodeId(3)).next().unwrap();
        assert_eq!(balanced_access.stack_depth(), 1);
        assert!(balanced_access.value_of(SymbolId(2)).is_none());
    }

    #[test]
    fn step_limit_stops_the_walk() {
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(
                BlockBuilder::new()
                    .points((1..=5).map(|id| literal(id, "1")))
                    .exit(),
            )
            .and_then(|b| b.build())
            .unwrap();

        let report = SymbolicExecution::new(
            &cfg,
            TransferEngine::new(),
            ExecutionConfig::new().max_steps(3),
        )
        .execute(&SymbolTable::new())
        .unwrap();

        assert_eq!(report.outcome, ExecutionOutcome::LimitReached);
        assert_eq!(report.history.len(), 3);
        assert!(report.exit_states.is_empty());
    }

    #[test]
    fn aborting_invariants_stop_the_walk() {
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(BlockBuilder::new().point(literal(1, "1")).exit())
            .and_then(|b| b.build())
            .unwrap();

        let result = SymbolicExecution::new(&cfg, TransferEngine::new(), ExecutionConfig::default())
            .with_invariants(InvariantBuilder::new().stack_balance().build())
            .execute(&SymbolTable::new());

        assert_eq!(
            result.unwrap_err(),
            ExecutionError::InvariantViolated {
                block: BlockId(0),
                violations: vec![InvariantViolation::StackImbalance {
                    expected: 0,
                    actual: 1
                }],
            }
        );
    }

    #[test]
    fn ignored_invariants_let_the_walk_finish() {
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(BlockBuilder::new().point(literal(1, "1")).exit())
            .and_then(|b| b.build())
            .unwrap();

        let report = SymbolicExecution::new(&cfg, TransferEngine::new(), ExecutionConfig::default())
            .with_invariants(
                InvariantBuilder::new()
                    .stack_balance()
                    .on_violation(ViolationStrategy::IgnoreAndLog)
                    .build(),
            )
            .execute(&SymbolTable::new())
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.exit_states.len(), 1);
    }

    #[test]
    fn branch_blocks_are_balanced_with_their_condition() {
        let cfg = ControlFlowGraph::builder()
            .entry(BlockId(0))
            .block(BlockBuilder::new().point(literal(1, "1")).branch(BlockId(1), BlockId(1)))
            .and_then(|b| b.block(BlockBuilder::new().exit()))
            .and_then(|b| b.build())
            .unwrap();

        let report = SymbolicExecution::new(&cfg, TransferEngine::new(), ExecutionConfig::default())
            .with_invariants(InvariantRules::standard())
            .execute(&SymbolTable::new());

        assert!(report.is_ok());
    }
}
