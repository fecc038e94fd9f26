//! Builders for control-flow graphs and their blocks.

use super::error::BuildError;
use super::{Block, BlockId, ControlFlowGraph, Terminator};
use crate::syntax::ProgramPoint;

/// Builder for one block with a fluent API.
pub struct BlockBuilder {
    points: Vec<ProgramPoint>,
    terminator: Option<Terminator>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            terminator: None,
        }
    }

    /// Append a program point.
    pub fn point(mut self, point: ProgramPoint) -> Self {
        self.points.push(point);
        self
    }

    /// Append several program points in evaluation order.
    pub fn points(mut self, points: impl IntoIterator<Item = ProgramPoint>) -> Self {
        self.points.extend(points);
        self
    }

    pub fn jump(mut self, target: BlockId) -> Self {
        self.terminator = Some(Terminator::Jump(target));
        self
    }

    /// Branch on the last point added.
    pub fn branch(mut self, when_true: BlockId, when_false: BlockId) -> Self {
        self.terminator = Some(Terminator::Branch {
            when_true,
            when_false,
        });
        self
    }

    pub fn exit(mut self) -> Self {
        self.terminator = Some(Terminator::Exit);
        self
    }

    /// Build the block.
    /// Returns an error if the terminator is missing or a branch has no condition.
    pub fn build(self) -> Result<Block, BuildError> {
        let terminator = self.terminator.ok_or(BuildError::MissingTerminator)?;
        if matches!(terminator, Terminator::Branch { .. }) && self.points.is_empty() {
            return Err(BuildError::EmptyBranchBlock);
        }
        Ok(Block::new(self.points, terminator))
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for control-flow graphs.
///
/// Blocks are numbered in the order they are added, starting at `B0`.
///
/// # Example
///
/// ```rust
/// use symflow::cfg::{BlockBuilder, BlockId, CfgBuilder};
/// use symflow::syntax::{NodeId, PointKind, ProgramPoint};
///
/// // if (x) { a } else { b }
/// let cfg = CfgBuilder::new()
///     .entry(BlockId(0))
///     .block(
///         BlockBuilder::new()
///             .point(ProgramPoint::new(NodeId(1), PointKind::Identifier))
///             .branch(BlockId(1), BlockId(2)),
///     )?
///     .block(BlockBuilder::new().jump(BlockId(3)))?
///     .block(BlockBuilder::new().jump(BlockId(3)))?
///     .block(BlockBuilder::new().exit())?
///     .build()?;
///
/// assert_eq!(cfg.len(), 4);
/// assert_eq!(cfg.successors(BlockId(0)), vec![BlockId(1), BlockId(2)]);
/// # Ok::<(), symflow::cfg::BuildError>(())
/// ```
pub struct CfgBuilder {
    entry: Option<BlockId>,
    blocks: Vec<Block>,
}

impl CfgBuilder {
    pub fn new() -> Self {
        Self {
            entry: None,
            blocks: Vec::new(),
        }
    }

    /// Set the entry block (required).
    pub fn entry(mut self, block: BlockId) -> Self {
        self.entry = Some(block);
        self
    }

    /// Add a block using a builder.
    /// Returns an error if the builder fails validation.
    pub fn block(mut self, builder: BlockBuilder) -> Result<Self, BuildError> {
        let block = builder.build()?;
        self.blocks.push(block);
        Ok(self)
    }

    /// Add a pre-built block.
    pub fn add_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Add multiple blocks at once.
    pub fn blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    /// Build the graph.
    /// Returns an error if the entry is missing or any edge is dangling.
    pub fn build(self) -> Result<ControlFlowGraph, BuildError> {
        let entry = self.entry.ok_or(BuildError::MissingEntry)?;

        if self.blocks.is_empty() {
            return Err(BuildError::NoBlocks);
        }

        let defined = |id: &BlockId| id.0 < self.blocks.len();
        if !defined(&entry) {
            return Err(BuildError::UnknownBlock { block: entry });
        }
        if let Some(block) = self
            .blocks
            .iter()
            .flat_map(|block| block.terminator.successors())
            .find(|successor| !defined(successor))
        {
            return Err(BuildError::UnknownBlock { block });
        }

        Ok(ControlFlowGraph {
            blocks: self.blocks,
            entry,
        })
    }
}

impl Default for CfgBuilder {
    fn default() -> Self {
        Self::new()
    }
}
