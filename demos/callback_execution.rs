//! Callback Execution Tracking
//!
//! This example shows the interprocedural hook telling the engine that a
//! call invokes its first argument, so the callback is marked as executed.
//!
//! ```js
//! function handler() {}
//! setTimeout(handler, 10);
//! ```
//!
//! Run with: RUST_LOG=symflow=trace cargo run --example callback_execution

use symflow::cfg::{BlockBuilder, BlockId, CfgBuilder};
use symflow::execution::{ExecutionConfig, SymbolicExecution};
use symflow::snapshot::StateSnapshot;
use symflow::syntax::{NodeId, PointKind, ProgramPoint, SymbolId, SymbolTable};
use symflow::transfer::InterproceduralInfo;

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

    let handler = SymbolId(1);
    let resolver = SymbolTable::new()
        .with(NodeId(1), handler)
        .with(NodeId(4), handler);

    let call = NodeId(6);
    let cfg = CfgBuilder::new()
        .entry(BlockId(0))
        .block(
            BlockBuilder::new()
                .point(point(2, PointKind::FunctionDeclaration { name: Some(NodeId(1)) }))
                .point(point(3, PointKind::Other))
                .point(point(4, PointKind::Identifier))
                .point(point(5, PointKind::NumericLiteral { text: "10".into() }))
                .point(point(call.0, PointKind::Call { arguments: 2 }))
                .point(point(7, PointKind::ExpressionStatement))
                .exit(),
        )?
        .build()?;

    // setTimeout invokes its first parameter and nothing else
    let config = ExecutionConfig::from_json(r#"{ "max_block_visits": 16 }"#)?;
    let engine = config
        .engine_builder()
        .on_call(move |point: &ProgramPoint| {
            if point.id == call {
                InterproceduralInfo::new().with_parameters([true, false])
            } else {
                InterproceduralInfo::new()
            }
        })
        .build();

    let report = SymbolicExecution::new(&cfg, engine, config).execute(&resolver)?;

    println!("=== Callback Execution Tracking ===\n");
    for state in &report.exit_states {
        if let Some(value) = state.value_of(handler) {
            let executed = state.constraints_of(value).is_executed();
            println!("handler ({}) executed: {}", value, executed);
        }
    }

    let snapshot = StateSnapshot::from_report("callback_execution", &report);
    let bytes = snapshot.to_binary()?;
    let restored = StateSnapshot::from_binary(&bytes)?;
    println!(
        "\nSnapshot {} ({} bytes) restored with {} recorded states",
        restored.id,
        bytes.len(),
        restored.history.len()
    );

    Ok(())
}
