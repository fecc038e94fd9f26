//! Syntax surface consumed by the engine.
//!
//! The front end lowers each AST construct whose evaluation effect is modeled
//! into a [`ProgramPoint`]: the node's identity plus a closed [`PointKind`]
//! describing what the transfer function needs to know about it. Identifier
//! resolution stays with the front end and is queried through
//! [`SymbolResolver`].

mod resolver;

pub use resolver::{SymbolResolver, SymbolTable};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an AST node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Identity of a resolved declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym#{}", self.0)
    }
}

/// A node of the control-flow graph whose evaluation effect is modeled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgramPoint {
    pub id: NodeId,
    pub kind: PointKind,
}

impl ProgramPoint {
    pub fn new(id: NodeId, kind: PointKind) -> Self {
        Self { id, kind }
    }
}

/// Syntactic kind of a program point.
///
/// Destructuring patterns are flattened by the front end: assignment targets
/// list every identifier found on the left-hand side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointKind {
    /// `let x;` with no initializer. `name` is the declared identifier.
    BareDeclaration { name: NodeId },
    NumericLiteral { text: String },
    BooleanLiteral { value: bool },
    /// A reference to a name; the point's own node is resolved.
    Identifier,
    /// Any binary operator that does not assign.
    Binary { operator: BinaryOperator },
    /// `target = value`, including destructuring targets.
    Assignment { targets: Vec<NodeId> },
    /// `target op= value`.
    CompoundAssignment {
        operator: CompoundOperator,
        targets: Vec<NodeId>,
    },
    /// Function declarations and expressions, arrow functions and methods.
    FunctionDeclaration { name: Option<NodeId> },
    /// `let x = init;`, evaluated after its initializer.
    VariableDeclaration { name: NodeId },
    /// Evaluated after the callee and then each argument.
    Call { arguments: usize },
    /// Evaluated after each member initializer.
    ObjectLiteral { members: usize },
    /// `object.name`, evaluated after `object`.
    PropertyAccess { name: NodeId },
    PrefixUnary { operator: PrefixOperator },
    /// `operand` is set when the operand is a plain identifier.
    PostfixUnary {
        operator: PostfixOperator,
        operand: Option<NodeId>,
    },
    /// End of an expression statement; its value is no longer needed.
    ExpressionStatement,
    /// Anything the engine does not model.
    Other,
}

impl PointKind {
    /// Short label used in logs and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BareDeclaration { .. } => "BareDeclaration",
            Self::NumericLiteral { .. } => "NumericLiteral",
            Self::BooleanLiteral { .. } => "BooleanLiteral",
            Self::Identifier => "Identifier",
            Self::Binary { .. } => "Binary",
            Self::Assignment { .. } => "Assignment",
            Self::CompoundAssignment { .. } => "CompoundAssignment",
            Self::FunctionDeclaration { .. } => "FunctionDeclaration",
            Self::VariableDeclaration { .. } => "VariableDeclaration",
            Self::Call { .. } => "Call",
            Self::ObjectLiteral { .. } => "ObjectLiteral",
            Self::PropertyAccess { .. } => "PropertyAccess",
            Self::PrefixUnary { .. } => "PrefixUnary",
            Self::PostfixUnary { .. } => "PostfixUnary",
            Self::ExpressionStatement => "ExpressionStatement",
            Self::Other => "Other",
        }
    }
}

/// Non-assigning binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Exponent,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    BitAnd,
    BitOr,
    BitXor,
    LogicalAnd,
    LogicalOr,
    Nullish,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    In,
    InstanceOf,
    Comma,
}

/// Operators of the `op=` family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Exponent,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    BitAnd,
    BitOr,
    BitXor,
    LogicalAnd,
    LogicalOr,
    Nullish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefixOperator {
    /// `!`
    Not,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `~`
    BitNot,
    Increment,
    Decrement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostfixOperator {
    Increment,
    Decrement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_names_each_kind() {
        assert_eq!(PointKind::Identifier.label(), "Identifier");
        assert_eq!(PointKind::Call { arguments: 2 }.label(), "Call");
        assert_eq!(PointKind::Other.label(), "Other");
    }

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(NodeId(7).to_string(), "node#7");
        assert_eq!(SymbolId(3).to_string(), "sym#3");
    }

    #[test]
    fn point_serializes_correctly() {
        let point = ProgramPoint::new(
            NodeId(4),
            PointKind::Assignment {
                targets: vec![NodeId(1), NodeId(2)],
            },
        );
        let json = serde_json::to_string(&point).unwrap();
        let deserialized: ProgramPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(point, deserialized);
    }
}
