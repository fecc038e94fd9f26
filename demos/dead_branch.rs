//! Dead Branch Detection
//!
//! This example walks a function whose condition is a constant and reports
//! the branch that can never run.
//!
//! ```js
//! function f() {
//!   let debug = 0;
//!   if (debug) { log(); }
//!   return;
//! }
//! ```
//!
//! Run with: RUST_LOG=symflow=debug cargo run --example dead_branch

use symflow::cfg::{BlockBuilder, BlockId, CfgBuilder};
use symflow::core::Constraint;
use symflow::execution::{ExecutionConfig, SymbolicExecution};
use symflow::invariants::InvariantRules;
use symflow::syntax::{NodeId, PointKind, ProgramPoint, SymbolId, SymbolTable};
use symflow::transfer::TransferEngine;

fn point(id: u32, kind: PointKind) -> ProgramPoint {
    ProgramPoint::new(NodeId(id), kind)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let debug_decl = NodeId(1);
    let debug_ref = NodeId(3);
    let resolver = SymbolTable::new()
        .with(debug_decl, SymbolId(1))
        .with(debug_ref, SymbolId(1));

    let cfg = CfgBuilder::new()
        .entry(BlockId(0))
        .block(
            BlockBuilder::new()
                .point(point(2, PointKind::NumericLiteral { text: "0".into() }))
                .point(point(10, PointKind::VariableDeclaration { name: debug_decl }))
                .point(point(3, PointKind::Identifier))
                .branch(BlockId(1), BlockId(2)),
        )?
        .block(
            BlockBuilder::new()
                .point(point(4, PointKind::Other))
                .point(point(5, PointKind::Call { arguments: 0 }))
                .point(point(6, PointKind::ExpressionStatement))
                .jump(BlockId(2)),
        )?
        .block(BlockBuilder::new().exit())?
        .build()?;

    let report = SymbolicExecution::new(&cfg, TransferEngine::new(), ExecutionConfig::default())
        .with_invariants(InvariantRules::standard())
        .execute(&resolver)?;

    println!("=== Dead Branch Detection ===\n");
    println!("Outcome: {:?}", report.outcome);
    println!("States recorded: {}", report.history.len());

    for (id, block) in cfg.blocks() {
        if let Some(condition) = block.condition() {
            for constraint in [Constraint::Truthy, Constraint::Falsy] {
                if report.history.always(condition.id, constraint) {
                    println!("Condition at {} is always {}", condition.id, constraint);
                }
            }
        }
        if !report.was_reached(id) {
            println!("Block {} is unreachable ({} points)", id, block.points.len());
        }
    }

    Ok(())
}
