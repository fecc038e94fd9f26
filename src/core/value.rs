//! Symbolic values.
//!
//! A symbolic value stands in for "whatever runtime value occupies this stack
//! slot or binding". Values carry no concrete data beyond their kind and are
//! compared by identity only: two numeric literals with the same text are
//! still two different values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_VALUE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a symbolic value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueId(pub u64);

impl ValueId {
    fn fresh() -> Self {
        ValueId(NEXT_VALUE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sv#{}", self.0)
    }
}

/// What a symbolic value was created from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Unknown,
    /// Printed form of the literal, as written in source.
    NumericLiteral(Arc<str>),
    BooleanLiteral,
    Undefined,
    ObjectLiteral,
    /// A function or closure.
    Executable,
}

/// Immutable, identity-distinct token shared by reference across states.
///
/// # Example
///
/// ```rust
/// use symflow::core::SymbolicValue;
///
/// let a = SymbolicValue::numeric_literal("1");
/// let b = SymbolicValue::numeric_literal("1");
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymbolicValue {
    id: ValueId,
    kind: ValueKind,
}

impl SymbolicValue {
    fn fresh(kind: ValueKind) -> Self {
        Self {
            id: ValueId::fresh(),
            kind,
        }
    }

    pub fn unknown() -> Self {
        Self::fresh(ValueKind::Unknown)
    }

    pub fn numeric_literal(text: impl Into<Arc<str>>) -> Self {
        Self::fresh(ValueKind::NumericLiteral(text.into()))
    }

    /// A boolean, literal or computed. Its truth is recorded as a constraint
    /// by the engine rather than in the value itself.
    pub fn boolean_literal() -> Self {
        Self::fresh(ValueKind::BooleanLiteral)
    }

    pub fn undefined() -> Self {
        Self::fresh(ValueKind::Undefined)
    }

    pub fn object_literal() -> Self {
        Self::fresh(ValueKind::ObjectLiteral)
    }

    pub fn executable() -> Self {
        Self::fresh(ValueKind::Executable)
    }

    pub fn id(&self) -> ValueId {
        self.id
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, ValueKind::Unknown)
    }

    pub fn is_executable(&self) -> bool {
        matches!(self.kind, ValueKind::Executable)
    }
}

impl PartialEq for SymbolicValue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SymbolicValue {}

impl Hash for SymbolicValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Unknown => write!(f, "{}(unknown)", self.id),
            ValueKind::NumericLiteral(text) => write!(f, "{}({})", self.id, text),
            ValueKind::BooleanLiteral => write!(f, "{}(boolean)", self.id),
            ValueKind::Undefined => write!(f, "{}(undefined)", self.id),
            ValueKind::ObjectLiteral => write!(f, "{}(object)", self.id),
            ValueKind::Executable => write!(f, "{}(executable)", self.id),
        }
    }
}
