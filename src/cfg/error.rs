//! Build errors for control-flow graphs and blocks.

use super::BlockId;
use thiserror::Error;

/// Errors that can occur when building control-flow graphs and blocks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Entry block not specified. Call .entry(block) before .build()")]
    MissingEntry,

    #[error("No blocks defined. Add at least one block")]
    NoBlocks,

    #[error("Block {block} is referenced but never defined")]
    UnknownBlock { block: BlockId },

    #[error("Block terminator not specified. Call .jump(), .branch() or .exit()")]
    MissingTerminator,

    #[error("Branching block has no condition point")]
    EmptyBranchBlock,
}
