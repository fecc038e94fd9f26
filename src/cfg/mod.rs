//! Control-flow graphs consumed by the execution walker.
//!
//! Constructing the graph from an AST is the front end's job; this module
//! only defines the shape the walker understands and a validating builder.
//!
//! A graph is a list of blocks addressed by [`BlockId`]. Each block holds its
//! program points in evaluation order and a [`Terminator`] describing how
//! control leaves it. A branching block's last point is its condition.

mod builder;
mod error;

pub use builder::{BlockBuilder, CfgBuilder};
pub use error::BuildError;

use crate::syntax::ProgramPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub usize);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// How control leaves a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminator {
    /// Unconditional edge; also used for loop back-edges
    Jump(BlockId),

    /// Two-way branch on the value of the block's last point
    Branch { when_true: BlockId, when_false: BlockId },

    /// Leaves the function
    Exit,
}

impl Terminator {
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Jump(target) => vec![*target],
            Terminator::Branch {
                when_true,
                when_false,
            } => vec![*when_true, *when_false],
            Terminator::Exit => Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub points: Vec<ProgramPoint>,
    pub terminator: Terminator,
}

impl Block {
    pub fn new(points: Vec<ProgramPoint>, terminator: Terminator) -> Self {
        Self { points, terminator }
    }

    /// The branch condition, for branching blocks.
    pub fn condition(&self) -> Option<&ProgramPoint> {
        match self.terminator {
            Terminator::Branch { .. } => self.points.last(),
            _ => None,
        }
    }
}

/// A validated control-flow graph. Build one with [`CfgBuilder`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    blocks: Vec<Block>,
    entry: BlockId,
}

impl ControlFlowGraph {
    pub fn builder() -> CfgBuilder {
        CfgBuilder::new()
    }

    pub fn entry(&self) -> BlockId {
        self.entry
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (BlockId(index), block))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn successors(&self, id: BlockId) -> Vec<BlockId> {
        self.block(id)
            .map(|block| block.terminator.successors())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{NodeId, PointKind};

    #[test]
    fn terminator_successors() {
        assert_eq!(Terminator::Jump(BlockId(2)).successors(), vec![BlockId(2)]);
        assert_eq!(
            Terminator::Branch {
                when_true: BlockId(1),
                when_false: BlockId(3)
            }
            .successors(),
            vec![BlockId(1), BlockId(3)]
        );
        assert!(Terminator::Exit.successors().is_empty());
    }

    #[test]
    fn condition_is_last_point_of_branch() {
        let condition = ProgramPoint::new(NodeId(2), PointKind::Identifier);
        let block = Block::new(
            vec![
                ProgramPoint::new(NodeId(1), PointKind::Other),
                condition.clone(),
            ],
            Terminator::Branch {
                when_true: BlockId(1),
                when_false: BlockId(2),
            },
        );

        assert_eq!(block.condition(), Some(&condition));
    }

    #[test]
    fn jump_block_has_no_condition() {
        let block = Block::new(
            vec![ProgramPoint::new(NodeId(1), PointKind::Identifier)],
            Terminator::Exit,
        );

        assert!(block.condition().is_none());
    }
}
