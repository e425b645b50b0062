//! Hook registration, pipeline compilation, and execution.
//!
//! Registered hooks accumulate per extension point as plain ordered lists.
//! A point's pipeline is compiled on first execution (or eagerly via
//! [`Hooks::build`]) into an immutable snapshot; execution then runs against
//! the snapshot without holding any lock, so a slow or re-entrant hook never
//! blocks other pipelines.

use core::any::type_name;
use std::sync::Arc;
use std::time::Instant;

use hashbrown::HashMap;
use parking_lot::RwLock;
use thiserror::Error;

use plinth_events::{Diagnostic, EventSink, TracingSink};
use plinth_registry::Context;

use crate::point::HookPoint;

// ─────────────────────────────────────────────────────────────────────────────
// HookError
// ─────────────────────────────────────────────────────────────────────────────

/// Failure raised by a hook function.
///
/// At a fail-fast point this aborts the pipeline and surfaces to the
/// caller; at a best-effort point it is reported and absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookError(String);

impl HookError {
    /// Creates a hook error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// A hook function: transforms an entity, or fails.
pub type HookFn<T> = Arc<dyn Fn(&Context, T) -> Result<T, HookError> + Send + Sync>;

/// Compiled snapshot of one point's pipeline.
type Pipeline<T> = Arc<[HookFn<T>]>;

/// Hook pipelines for one entity type.
///
/// Registration is a startup-time activity: hooks registered at a point
/// after that point's pipeline has compiled are not picked up. Execution is
/// lock-free over the compiled snapshot.
///
/// # Example
///
/// ```
/// use plinth_hooks::{HookPoint, Hooks};
/// use plinth_registry::Context;
///
/// #[derive(Clone)]
/// struct Order {
///     total: u32,
/// }
///
/// let hooks: Hooks<Order> = Hooks::new();
/// hooks.register(HookPoint::BeforeCreate, |_ctx, mut order: Order| {
///     order.total += 5;
///     Ok(order)
/// });
///
/// let order = hooks
///     .execute(&Context::new(), HookPoint::BeforeCreate, &Order { total: 10 })
///     .unwrap();
/// assert_eq!(order.total, 15);
/// ```
pub struct Hooks<T: Clone + Send + Sync + 'static> {
    /// Entity type name, used in diagnostics.
    resource: &'static str,
    /// Hooks as registered, in registration order per point.
    registered: RwLock<HashMap<HookPoint, Vec<HookFn<T>>>>,
    /// Compiled pipelines; a present entry is final.
    compiled: RwLock<HashMap<HookPoint, Pipeline<T>>>,
    sink: Arc<dyn EventSink>,
}

impl<T: Clone + Send + Sync + 'static> Default for Hooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Hooks<T> {
    /// Creates an empty hook set emitting through [`TracingSink`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    /// Creates an empty hook set emitting through the given sink.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self {
            resource: type_name::<T>(),
            registered: RwLock::new(HashMap::new()),
            compiled: RwLock::new(HashMap::new()),
            sink,
        }
    }

    /// Returns the entity type name used in diagnostics.
    #[must_use]
    pub fn resource(&self) -> &'static str {
        self.resource
    }

    /// Appends a hook at the given point.
    ///
    /// Hooks run in registration order. If the point's pipeline has already
    /// compiled with hooks, the addition is recorded but will not run;
    /// registration is meant to finish before traffic starts. Points that
    /// were empty so far never compiled, so their first hook always takes
    /// effect.
    pub fn register(
        &self,
        point: HookPoint,
        hook: impl Fn(&Context, T) -> Result<T, HookError> + Send + Sync + 'static,
    ) {
        self.registered
            .write()
            .entry(point)
            .or_default()
            .push(Arc::new(hook));
        self.sink.emit(&Diagnostic::HookRegistered {
            point: point.as_str(),
            resource: self.resource,
        });
    }

    /// Eagerly compiles every point that has at least one registered hook.
    ///
    /// Optional; [`execute`](Self::execute) compiles lazily. Calling this
    /// after registration moves compilation cost out of the first request.
    /// Points with zero registered hooks are left uncompiled.
    pub fn build(&self) {
        for point in HookPoint::ALL {
            let _ = self.pipeline(point);
        }
    }

    /// Returns true if the point's compiled pipeline contains at least one
    /// hook.
    ///
    /// Reflects compiled state only: registered-but-uncompiled hooks do not
    /// count, and this never triggers compilation.
    #[must_use]
    pub fn has_hooks(&self, point: HookPoint) -> bool {
        self.compiled
            .read()
            .get(&point)
            .is_some_and(|pipeline| !pipeline.is_empty())
    }

    /// Runs the point's pipeline over `entity`, fail-fast.
    ///
    /// The entity is cloned once and threaded through each hook in
    /// registration order; the first failure aborts the rest and is
    /// returned, leaving the caller's original untouched. A point with no
    /// hooks returns a clone and emits nothing.
    pub fn execute(
        &self,
        ctx: &Context,
        point: HookPoint,
        entity: &T,
    ) -> Result<T, HookError> {
        let pipeline = self.pipeline(point);
        if pipeline.is_empty() {
            return Ok(entity.clone());
        }

        self.sink.emit(&Diagnostic::HookExecuting {
            point: point.as_str(),
            resource: self.resource,
        });
        let started = Instant::now();

        let mut current = entity.clone();
        for hook in pipeline.iter() {
            match hook(ctx, current) {
                Ok(next) => current = next,
                Err(err) => {
                    self.sink.emit(&Diagnostic::HookFailed {
                        point: point.as_str(),
                        resource: self.resource,
                        duration: started.elapsed(),
                        error: err.to_string(),
                    });
                    return Err(err);
                }
            }
        }

        self.sink.emit(&Diagnostic::HookCompleted {
            point: point.as_str(),
            resource: self.resource,
            duration: started.elapsed(),
        });
        Ok(current)
    }

    /// Runs the point's pipeline over `entity`, best-effort.
    ///
    /// On failure the error is reported as a `hook-after-error` diagnostic
    /// and the original entity is returned unchanged; partial transforms
    /// from hooks that ran before the failure are discarded.
    pub fn execute_after(&self, ctx: &Context, point: HookPoint, entity: T) -> T {
        match self.execute(ctx, point, &entity) {
            Ok(transformed) => transformed,
            Err(err) => {
                self.sink.emit(&Diagnostic::HookAfterError {
                    point: point.as_str(),
                    resource: self.resource,
                    error: err.to_string(),
                });
                entity
            }
        }
    }

    /// Returns the point's compiled pipeline, compiling it on first use.
    ///
    /// Compilation is double-checked under the write lock so concurrent
    /// first executions install exactly one snapshot. A point with zero
    /// registered hooks is left uncompiled: it executes as identity and
    /// stays open to later registration.
    fn pipeline(&self, point: HookPoint) -> Pipeline<T> {
        if let Some(pipeline) = self.compiled.read().get(&point) {
            return Arc::clone(pipeline);
        }

        let mut compiled = self.compiled.write();
        if let Some(pipeline) = compiled.get(&point) {
            return Arc::clone(pipeline);
        }

        match self.registered.read().get(&point) {
            Some(hooks) if !hooks.is_empty() => {
                let pipeline: Pipeline<T> = hooks.as_slice().into();
                compiled.insert(point, Arc::clone(&pipeline));
                pipeline
            }
            _ => Vec::new().into(),
        }
    }

    /// Discards compiled pipelines and registered hooks.
    ///
    /// Only available to tests; production hook sets are write-once.
    #[cfg(test)]
    pub(crate) fn reset(&self) {
        self.compiled.write().clear();
        self.registered.write().clear();
    }
}
