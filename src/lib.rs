//! An application-composition framework: a capability-gated service
//! registry paired with lifecycle hook pipelines.
//!
//! Compose an application by starting a [`Registry`], registering services
//! behind [`Token`] guards, freezing it, and wiring [`Resource`]
//! orchestrators whose [`Hooks`] pipelines run at six lifecycle extension
//! points. Diagnostics flow through an [`EventSink`]; install the
//! [`Telemetry`] stack to route them to `tracing`.

pub use plinth_events::{
    CollectingSink, Diagnostic, EventSink, Severity, Telemetry, TelemetryFormat, TracingSink,
};
pub use plinth_hooks::{HookError, HookFn, HookKind, HookPoint, Hooks};
pub use plinth_registry::{
    Context, ContractId, Guard, GuardError, Handle, Key, Registry, RegistryError, ServiceInfo,
    Token, require,
};
pub use plinth_resource::Resource;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use plinth_events::{EventSink, Telemetry, TelemetryFormat};
    pub use plinth_hooks::{HookError, HookPoint, Hooks};
    pub use plinth_registry::{Context, Registry, Token, require};
    pub use plinth_resource::Resource;
}
