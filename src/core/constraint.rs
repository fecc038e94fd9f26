//! Constraints attached to symbolic values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A predicate known to hold for a symbolic value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Constraint {
    Truthy,
    Falsy,
    Executed,
    NotExecuted,
}

impl Constraint {
    const ALL: [Constraint; 4] = [
        Constraint::Truthy,
        Constraint::Falsy,
        Constraint::Executed,
        Constraint::NotExecuted,
    ];

    fn bit(self) -> u8 {
        match self {
            Self::Truthy => 1 << 0,
            Self::Falsy => 1 << 1,
            Self::Executed => 1 << 2,
            Self::NotExecuted => 1 << 3,
        }
    }

    /// The constraint that can never hold together with this one.
    pub fn opposite(self) -> Constraint {
        match self {
            Self::Truthy => Self::Falsy,
            Self::Falsy => Self::Truthy,
            Self::Executed => Self::NotExecuted,
            Self::NotExecuted => Self::Executed,
        }
    }

    pub fn contradicts(self, other: Constraint) -> bool {
        self.opposite() == other
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Truthy => "truthy",
            Self::Falsy => "falsy",
            Self::Executed => "executed",
            Self::NotExecuted => "not-executed",
        };
        f.write_str(name)
    }
}

/// Set of constraints known for one value.
///
/// The set is always satisfiable: [`ConstraintSet::with`] refuses to add a
/// constraint whose opposite is already present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintSet {
    bits: u8,
}

impl ConstraintSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(constraint: Constraint) -> Self {
        Self {
            bits: constraint.bit(),
        }
    }

    /// Add `constraint`, or `None` when it contradicts the set.
    pub fn with(self, constraint: Constraint) -> Option<Self> {
        if self.contains(constraint.opposite()) {
            return None;
        }
        Some(Self {
            bits: self.bits | constraint.bit(),
        })
    }

    pub fn contains(&self, constraint: Constraint) -> bool {
        self.bits & constraint.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn is_truthy(&self) -> bool {
        self.contains(Constraint::Truthy)
    }

    pub fn is_falsy(&self) -> bool {
        self.contains(Constraint::Falsy)
    }

    pub fn is_executed(&self) -> bool {
        self.contains(Constraint::Executed)
    }

    pub fn is_not_executed(&self) -> bool {
        self.contains(Constraint::NotExecuted)
    }

    /// True when no pair of opposite constraints is present.
    pub fn is_consistent(&self) -> bool {
        !(self.is_truthy() && self.is_falsy()) && !(self.is_executed() && self.is_not_executed())
    }

    pub fn iter(&self) -> impl Iterator<Item = Constraint> + '_ {
        Constraint::ALL.into_iter().filter(|c| self.contains(*c))
    }
}
