//! Unified event enum for registry and hook diagnostics.
//!
//! All sinks receive `&Diagnostic` and can match on variants for typed
//! access. Event names returned by [`Diagnostic::name`] are a compatibility
//! contract with downstream consumers and are never renamed.

use core::fmt;
use core::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Severity
// ─────────────────────────────────────────────────────────────────────────────

/// Severity a sink should report an event at.
///
/// Routine lifecycle traffic is [`Severity::Debug`]; absorbed or surfaced
/// failures are [`Severity::Warn`]; resource-level operations are
/// [`Severity::Info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Routine diagnostic traffic.
    Debug,
    /// Operation-level milestones.
    Info,
    /// Denials and hook failures.
    Warn,
}

// ─────────────────────────────────────────────────────────────────────────────
// Diagnostic
// ─────────────────────────────────────────────────────────────────────────────

/// A named diagnostic event emitted by the registry or a hook pipeline.
///
/// Each variant corresponds to exactly one event name (see
/// [`name()`](Self::name)) and carries the structured fields that name is
/// documented to have.
#[derive(Debug, Clone)]
pub enum Diagnostic {
    // ─────────────────────────────────────────────────────────────────────────
    // Registry Events
    // ─────────────────────────────────────────────────────────────────────────
    /// A service implementation was registered for a contract.
    Registration {
        /// Type name of the contract being satisfied.
        contract: &'static str,
    },

    /// A lookup passed every guard and returned the implementation.
    AccessGranted {
        /// Type name of the resolved contract.
        contract: &'static str,
    },

    /// A guard refused a lookup.
    AccessDenied {
        /// Type name of the guarded contract.
        contract: &'static str,
        /// Text of the guard's error.
        error: String,
    },

    /// A lookup named a contract nothing was registered for.
    NotFound {
        /// Type name of the missing contract.
        contract: &'static str,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Hook Events
    // ─────────────────────────────────────────────────────────────────────────
    /// A hook function was registered at an extension point.
    HookRegistered {
        /// Display name of the extension point (e.g. `beforeCreate`).
        point: &'static str,
        /// Type name of the resource the pipeline belongs to.
        resource: &'static str,
    },

    /// A compiled pipeline is about to run.
    HookExecuting {
        /// Display name of the extension point.
        point: &'static str,
        /// Type name of the resource the pipeline belongs to.
        resource: &'static str,
    },

    /// A compiled pipeline ran to completion.
    HookCompleted {
        /// Display name of the extension point.
        point: &'static str,
        /// Type name of the resource the pipeline belongs to.
        resource: &'static str,
        /// Wall-clock time the pipeline took.
        duration: Duration,
    },

    /// A hook function failed and aborted the rest of its pipeline.
    HookFailed {
        /// Display name of the extension point.
        point: &'static str,
        /// Type name of the resource the pipeline belongs to.
        resource: &'static str,
        /// Wall-clock time until the failure.
        duration: Duration,
        /// Text of the failing hook's error.
        error: String,
    },

    /// An after-* pipeline failed; the error was absorbed, not surfaced.
    HookAfterError {
        /// Display name of the extension point.
        point: &'static str,
        /// Type name of the resource the pipeline belongs to.
        resource: &'static str,
        /// Text of the absorbed error.
        error: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Resource Operation Events
    // ─────────────────────────────────────────────────────────────────────────
    /// A resource create operation completed.
    ResourceCreated {
        /// Type name of the resource.
        resource: &'static str,
        /// Operation name (`create`).
        operation: &'static str,
    },

    /// A resource update operation completed.
    ResourceUpdated {
        /// Type name of the resource.
        resource: &'static str,
        /// Operation name (`update`).
        operation: &'static str,
        /// Identifier of the updated entity.
        entity_id: String,
    },

    /// A resource delete operation completed.
    ResourceDeleted {
        /// Type name of the resource.
        resource: &'static str,
        /// Operation name (`delete`).
        operation: &'static str,
        /// Identifier of the deleted entity.
        entity_id: String,
    },
}

impl Diagnostic {
    /// Returns the verbatim event name for this variant.
    ///
    /// These names are a compatibility contract with downstream telemetry
    /// consumers. Never rename one.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Diagnostic::Registration { .. } => "registration",
            Diagnostic::AccessGranted { .. } => "access-granted",
            Diagnostic::AccessDenied { .. } => "access-denied",
            Diagnostic::NotFound { .. } => "not-found",
            Diagnostic::HookRegistered { .. } => "hook-registered",
            Diagnostic::HookExecuting { .. } => "hook-executing",
            Diagnostic::HookCompleted { .. } => "hook-completed",
            Diagnostic::HookFailed { .. } => "hook-failed",
            Diagnostic::HookAfterError { .. } => "hook-after-error",
            Diagnostic::ResourceCreated { .. } => "resource-created",
            Diagnostic::ResourceUpdated { .. } => "resource-updated",
            Diagnostic::ResourceDeleted { .. } => "resource-deleted",
        }
    }

    /// Returns the severity a sink should report this event at.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::Registration { .. }
            | Diagnostic::AccessGranted { .. }
            | Diagnostic::NotFound { .. }
            | Diagnostic::HookRegistered { .. }
            | Diagnostic::HookExecuting { .. }
            | Diagnostic::HookCompleted { .. } => Severity::Debug,
            Diagnostic::AccessDenied { .. }
            | Diagnostic::HookFailed { .. }
            | Diagnostic::HookAfterError { .. } => Severity::Warn,
            Diagnostic::ResourceCreated { .. }
            | Diagnostic::ResourceUpdated { .. }
            | Diagnostic::ResourceDeleted { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Registration { contract } => {
                write!(f, "registration(contract: {})", contract)
            }
            Diagnostic::AccessGranted { contract } => {
                write!(f, "access-granted(contract: {})", contract)
            }
            Diagnostic::AccessDenied { contract, error } => {
                write!(f, "access-denied(contract: {}, error: {})", contract, error)
            }
            Diagnostic::NotFound { contract } => {
                write!(f, "not-found(contract: {})", contract)
            }
            Diagnostic::HookRegistered { point, resource } => {
                write!(f, "hook-registered({} on {})", point, resource)
            }
            Diagnostic::HookExecuting { point, resource } => {
                write!(f, "hook-executing({} on {})", point, resource)
            }
            Diagnostic::HookCompleted {
                point,
                resource,
                duration,
            } => {
                write!(
                    f,
                    "hook-completed({} on {}, duration: {:?})",
                    point, resource, duration
                )
            }
            Diagnostic::HookFailed {
                point,
                resource,
                duration,
                error,
            } => {
                write!(
                    f,
                    "hook-failed({} on {}, duration: {:?}, error: {})",
                    point, resource, duration, error
                )
            }
            Diagnostic::HookAfterError {
                point,
                resource,
                error,
            } => {
                write!(
                    f,
                    "hook-after-error({} on {}, error: {})",
                    point, resource, error
                )
            }
            Diagnostic::ResourceCreated {
                resource,
                operation,
            } => {
                write!(f, "resource-created({}, op: {})", resource, operation)
            }
            Diagnostic::ResourceUpdated {
                resource,
                operation,
                entity_id,
            } => {
                write!(
                    f,
                    "resource-updated({}, op: {}, id: {})",
                    resource, operation, entity_id
                )
            }
            Diagnostic::ResourceDeleted {
                resource,
                operation,
                entity_id,
            } => {
                write!(
                    f,
                    "resource-deleted({}, op: {}, id: {})",
                    resource, operation, entity_id
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_verbatim() {
        let cases: Vec<(Diagnostic, &str)> = vec![
            (Diagnostic::Registration { contract: "c" }, "registration"),
            (Diagnostic::AccessGranted { contract: "c" }, "access-granted"),
            (
                Diagnostic::AccessDenied {
                    contract: "c",
                    error: "no".into(),
                },
                "access-denied",
            ),
            (Diagnostic::NotFound { contract: "c" }, "not-found"),
            (
                Diagnostic::HookRegistered {
                    point: "beforeCreate",
                    resource: "User",
                },
                "hook-registered",
            ),
            (
                Diagnostic::HookExecuting {
                    point: "beforeCreate",
                    resource: "User",
                },
                "hook-executing",
            ),
            (
                Diagnostic::HookCompleted {
                    point: "beforeCreate",
                    resource: "User",
                    duration: Duration::ZERO,
                },
                "hook-completed",
            ),
            (
                Diagnostic::HookFailed {
                    point: "beforeCreate",
                    resource: "User",
                    duration: Duration::ZERO,
                    error: "boom".into(),
                },
                "hook-failed",
            ),
            (
                Diagnostic::HookAfterError {
                    point: "afterCreate",
                    resource: "User",
                    error: "boom".into(),
                },
                "hook-after-error",
            ),
            (
                Diagnostic::ResourceCreated {
                    resource: "User",
                    operation: "create",
                },
                "resource-created",
            ),
            (
                Diagnostic::ResourceUpdated {
                    resource: "User",
                    operation: "update",
                    entity_id: "1".into(),
                },
                "resource-updated",
            ),
            (
                Diagnostic::ResourceDeleted {
                    resource: "User",
                    operation: "delete",
                    entity_id: "1".into(),
                },
                "resource-deleted",
            ),
        ];

        for (event, expected) in cases {
            assert_eq!(event.name(), expected);
        }
    }

    #[test]
    fn denials_and_failures_are_warn() {
        let denied = Diagnostic::AccessDenied {
            contract: "c",
            error: "no".into(),
        };
        assert_eq!(denied.severity(), Severity::Warn);

        let failed = Diagnostic::HookFailed {
            point: "beforeCreate",
            resource: "User",
            duration: Duration::ZERO,
            error: "boom".into(),
        };
        assert_eq!(failed.severity(), Severity::Warn);

        let absorbed = Diagnostic::HookAfterError {
            point: "afterCreate",
            resource: "User",
            error: "boom".into(),
        };
        assert_eq!(absorbed.severity(), Severity::Warn);
    }

    #[test]
    fn routine_traffic_is_debug() {
        assert_eq!(
            Diagnostic::Registration { contract: "c" }.severity(),
            Severity::Debug
        );
        assert_eq!(
            Diagnostic::HookExecuting {
                point: "beforeCreate",
                resource: "User"
            }
            .severity(),
            Severity::Debug
        );
    }

    #[test]
    fn display_includes_fields() {
        let event = Diagnostic::HookFailed {
            point: "beforeUpdate",
            resource: "Order",
            duration: Duration::from_millis(3),
            error: "validation".into(),
        };
        let text = event.to_string();
        assert!(text.contains("beforeUpdate"));
        assert!(text.contains("Order"));
        assert!(text.contains("validation"));
    }
}
