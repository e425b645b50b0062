//! Extension points and their failure policy.
//!
//! Six points exist, one pair per CRUD-style operation. The pairing is
//! structural: a point's position relative to its operation decides how its
//! pipeline treats failures, via [`HookPoint::kind`]. Nothing ever branches
//! on a point's display name.

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// HookKind
// ─────────────────────────────────────────────────────────────────────────────

/// Failure policy of a pipeline at an extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// The first failing hook aborts the pipeline and the operation.
    FailFast,
    /// Failures are reported but never surfaced to the caller.
    BestEffort,
}

// ─────────────────────────────────────────────────────────────────────────────
// HookPoint
// ─────────────────────────────────────────────────────────────────────────────

/// An extension point in a resource's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Runs before a create commits; may veto it.
    BeforeCreate,
    /// Runs after a create commits.
    AfterCreate,
    /// Runs before an update commits; may veto it.
    BeforeUpdate,
    /// Runs after an update commits.
    AfterUpdate,
    /// Runs before a delete commits; may veto it.
    BeforeDelete,
    /// Runs after a delete commits.
    AfterDelete,
}

impl HookPoint {
    /// Every extension point, in lifecycle order.
    pub const ALL: [HookPoint; 6] = [
        HookPoint::BeforeCreate,
        HookPoint::AfterCreate,
        HookPoint::BeforeUpdate,
        HookPoint::AfterUpdate,
        HookPoint::BeforeDelete,
        HookPoint::AfterDelete,
    ];

    /// Returns the point's failure policy.
    ///
    /// `before*` points fail fast; `after*` points are best-effort, since
    /// the operation they follow has already committed.
    #[must_use]
    pub fn kind(self) -> HookKind {
        match self {
            HookPoint::BeforeCreate | HookPoint::BeforeUpdate | HookPoint::BeforeDelete => {
                HookKind::FailFast
            }
            HookPoint::AfterCreate | HookPoint::AfterUpdate | HookPoint::AfterDelete => {
                HookKind::BestEffort
            }
        }
    }

    /// Returns the point's display name, as used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HookPoint::BeforeCreate => "beforeCreate",
            HookPoint::AfterCreate => "afterCreate",
            HookPoint::BeforeUpdate => "beforeUpdate",
            HookPoint::AfterUpdate => "afterUpdate",
            HookPoint::BeforeDelete => "beforeDelete",
            HookPoint::AfterDelete => "afterDelete",
        }
    }

    /// Returns the name of the operation this point belongs to.
    #[must_use]
    pub fn operation(self) -> &'static str {
        match self {
            HookPoint::BeforeCreate | HookPoint::AfterCreate => "create",
            HookPoint::BeforeUpdate | HookPoint::AfterUpdate => "update",
            HookPoint::BeforeDelete | HookPoint::AfterDelete => "delete",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
