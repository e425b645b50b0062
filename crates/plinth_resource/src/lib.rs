//! Thin resource orchestrator for Plinth.
//!
//! A [`Resource`] wires one entity type's hook pipelines around CRUD-style
//! operations and keeps a handle to the application's [`Registry`] so hooks
//! and callers resolve collaborating services through one seam. The
//! orchestrator owns no storage; persistence lives behind whatever service
//! the application registers.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use plinth_hooks::HookError;
//! use plinth_registry::{Context, Registry};
//! use plinth_resource::Resource;
//!
//! #[derive(Clone)]
//! struct User {
//!     email: String,
//! }
//!
//! let registry = Arc::new(Registry::new());
//! let key = registry.start();
//! registry.freeze(&key);
//!
//! let users: Resource<User> = Resource::new(Arc::clone(&registry));
//! users.before_create(|_ctx, user: User| {
//!     if user.email.is_empty() {
//!         Err(HookError::new("email required"))
//!     } else {
//!         Ok(user)
//!     }
//! });
//!
//! let ctx = Context::new();
//! let user = users.create(&ctx, User { email: "a@b.example".into() }).unwrap();
//! assert_eq!(user.email, "a@b.example");
//! ```

use core::any::type_name;
use std::sync::Arc;

use plinth_events::{Diagnostic, EventSink, TracingSink};
use plinth_hooks::{HookError, HookPoint, Hooks};
use plinth_registry::{Context, Registry, RegistryError};

/// Orchestrates one entity type's lifecycle operations.
pub struct Resource<T: Clone + Send + Sync + 'static> {
    /// Entity type name, used in diagnostics.
    name: &'static str,
    hooks: Hooks<T>,
    registry: Arc<Registry>,
    sink: Arc<dyn EventSink>,
}

impl<T: Clone + Send + Sync + 'static> Resource<T> {
    /// Creates an orchestrator bound to the given registry, emitting
    /// through [`TracingSink`].
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_sink(registry, Arc::new(TracingSink))
    }

    /// Creates an orchestrator emitting through the given sink.
    ///
    /// The hook pipelines share the sink, so one collector sees both hook
    /// and operation events.
    #[must_use]
    pub fn with_sink(registry: Arc<Registry>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            name: type_name::<T>(),
            hooks: Hooks::with_sink(Arc::clone(&sink)),
            registry,
            sink,
        }
    }

    /// Returns the entity type name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the underlying hook pipelines.
    #[must_use]
    pub fn hooks(&self) -> &Hooks<T> {
        &self.hooks
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hook registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a hook to run before creates; failures veto the create.
    pub fn before_create(
        &self,
        hook: impl Fn(&Context, T) -> Result<T, HookError> + Send + Sync + 'static,
    ) -> &Self {
        self.hooks.register(HookPoint::BeforeCreate, hook);
        self
    }

    /// Registers a hook to run after creates; failures are absorbed.
    pub fn after_create(
        &self,
        hook: impl Fn(&Context, T) -> Result<T, HookError> + Send + Sync + 'static,
    ) -> &Self {
        self.hooks.register(HookPoint::AfterCreate, hook);
        self
    }

    /// Registers a hook to run before updates; failures veto the update.
    pub fn before_update(
        &self,
        hook: impl Fn(&Context, T) -> Result<T, HookError> + Send + Sync + 'static,
    ) -> &Self {
        self.hooks.register(HookPoint::BeforeUpdate, hook);
        self
    }

    /// Registers a hook to run after updates; failures are absorbed.
    pub fn after_update(
        &self,
        hook: impl Fn(&Context, T) -> Result<T, HookError> + Send + Sync + 'static,
    ) -> &Self {
        self.hooks.register(HookPoint::AfterUpdate, hook);
        self
    }

    /// Registers a hook to run before deletes; failures veto the delete.
    pub fn before_delete(
        &self,
        hook: impl Fn(&Context, T) -> Result<T, HookError> + Send + Sync + 'static,
    ) -> &Self {
        self.hooks.register(HookPoint::BeforeDelete, hook);
        self
    }

    /// Registers a hook to run after deletes; failures are absorbed.
    pub fn after_delete(
        &self,
        hook: impl Fn(&Context, T) -> Result<T, HookError> + Send + Sync + 'static,
    ) -> &Self {
        self.hooks.register(HookPoint::AfterDelete, hook);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs the create lifecycle over `entity`.
    ///
    /// `beforeCreate` runs fail-fast; a failure surfaces here and nothing
    /// else happens. On success the committed entity flows through
    /// `afterCreate` error-tolerantly and a `resource-created` diagnostic
    /// is emitted.
    pub fn create(&self, ctx: &Context, entity: T) -> Result<T, HookError> {
        let committed = self.hooks.execute(ctx, HookPoint::BeforeCreate, &entity)?;
        let entity = self.hooks.execute_after(ctx, HookPoint::AfterCreate, committed);
        self.sink.emit(&Diagnostic::ResourceCreated {
            resource: self.name,
            operation: HookPoint::BeforeCreate.operation(),
        });
        Ok(entity)
    }

    /// Runs the update lifecycle over `entity`, identified by `id`.
    ///
    /// Same shape as [`create`](Self::create): `beforeUpdate` fail-fast,
    /// `afterUpdate` tolerant, then a `resource-updated` diagnostic
    /// carrying the entity id.
    pub fn update(&self, ctx: &Context, id: impl Into<String>, entity: T) -> Result<T, HookError> {
        let committed = self.hooks.execute(ctx, HookPoint::BeforeUpdate, &entity)?;
        let entity = self.hooks.execute_after(ctx, HookPoint::AfterUpdate, committed);
        self.sink.emit(&Diagnostic::ResourceUpdated {
            resource: self.name,
            operation: HookPoint::BeforeUpdate.operation(),
            entity_id: id.into(),
        });
        Ok(entity)
    }

    /// Runs the delete lifecycle over `entity`, identified by `id`.
    ///
    /// `beforeDelete` fail-fast, `afterDelete` tolerant, then a
    /// `resource-deleted` diagnostic. The entity itself is consumed; a
    /// delete has no committed state to return.
    pub fn delete(&self, ctx: &Context, id: impl Into<String>, entity: T) -> Result<(), HookError> {
        let committed = self.hooks.execute(ctx, HookPoint::BeforeDelete, &entity)?;
        let _ = self.hooks.execute_after(ctx, HookPoint::AfterDelete, committed);
        self.sink.emit(&Diagnostic::ResourceDeleted {
            resource: self.name,
            operation: HookPoint::BeforeDelete.operation(),
            entity_id: id.into(),
        });
        Ok(())
    }

    /// Resolves a collaborating service through the bound registry.
    ///
    /// Convenience passthrough to [`Registry::use_service`], so hooks and
    /// operation callers share one resolution seam.
    pub fn resolve<S: Send + Sync + 'static>(&self, ctx: &Context) -> Result<Arc<S>, RegistryError> {
        self.registry.use_service::<S>(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_events::CollectingSink;
    use plinth_registry::Token;

    #[derive(Debug, Clone, PartialEq)]
    struct Article {
        slug: String,
        published: bool,
    }

    fn article() -> Article {
        Article {
            slug: "intro".into(),
            published: false,
        }
    }

    fn frozen_registry() -> Arc<Registry> {
        let registry = Arc::new(Registry::new());
        let key = registry.start();
        registry.freeze(&key);
        registry
    }

    fn collecting() -> (Resource<Article>, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let resource = Resource::with_sink(frozen_registry(), Arc::clone(&sink) as Arc<dyn EventSink>);
        (resource, sink)
    }

    #[test]
    fn create_runs_before_then_after() {
        let (resource, _sink) = collecting();
        resource
            .before_create(|_ctx, mut a: Article| {
                a.slug = format!("drafts/{}", a.slug);
                Ok(a)
            })
            .after_create(|_ctx, mut a: Article| {
                a.published = true;
                Ok(a)
            });

        let out = resource.create(&Context::new(), article()).unwrap();
        assert_eq!(out.slug, "drafts/intro");
        assert!(out.published);
    }

    #[test]
    fn before_create_failure_vetoes_and_emits_nothing_resource_level() {
        let (resource, sink) = collecting();
        resource.before_create(|_ctx, _a: Article| Err(HookError::new("slug taken")));
        sink.clear();

        let err = resource.create(&Context::new(), article()).unwrap_err();
        assert_eq!(err.to_string(), "slug taken");
        assert!(!sink.names().contains(&"resource-created"));
    }

    #[test]
    fn after_create_failure_is_absorbed() {
        let (resource, sink) = collecting();
        resource.after_create(|_ctx, _a: Article| Err(HookError::new("webhook down")));
        sink.clear();

        let out = resource.create(&Context::new(), article()).unwrap();
        assert_eq!(out, article());

        let names = sink.names();
        assert!(names.contains(&"hook-after-error"));
        assert!(names.contains(&"resource-created"));
    }

    #[test]
    fn update_carries_entity_id_in_diagnostic() {
        let (resource, sink) = collecting();
        sink.clear();

        let out = resource.update(&Context::new(), "art-7", article()).unwrap();
        assert_eq!(out, article());

        let events = sink.events();
        let updated = events
            .iter()
            .find(|e| e.name() == "resource-updated")
            .unwrap();
        match updated {
            Diagnostic::ResourceUpdated {
                operation,
                entity_id,
                ..
            } => {
                assert_eq!(*operation, "update");
                assert_eq!(entity_id, "art-7");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn delete_runs_both_points_and_emits() {
        let (resource, sink) = collecting();
        resource
            .before_delete(|_ctx, a: Article| {
                if a.published {
                    Err(HookError::new("unpublish first"))
                } else {
                    Ok(a)
                }
            })
            .after_delete(|_ctx, a: Article| Ok(a));
        sink.clear();

        resource.delete(&Context::new(), "art-7", article()).unwrap();
        assert!(sink.names().contains(&"resource-deleted"));

        let published = Article {
            published: true,
            ..article()
        };
        let err = resource
            .delete(&Context::new(), "art-8", published)
            .unwrap_err();
        assert_eq!(err.to_string(), "unpublish first");
    }

    #[test]
    fn resolve_passes_through_registry_guards() {
        struct Search;

        let registry = Arc::new(Registry::new());
        let key = registry.start();
        let indexers = Token::new("indexers");
        let _ = registry.register(&key, Search).restrict([indexers.clone()]);
        registry.freeze(&key);

        let resource: Resource<Article> = Resource::new(registry);

        let granted = Context::new().with_token(indexers);
        assert!(resource.resolve::<Search>(&granted).is_ok());
        assert!(resource.resolve::<Search>(&Context::new()).is_err());
    }

    #[test]
    fn hooks_accessor_exposes_pipelines() {
        let (resource, _sink) = collecting();
        resource.before_update(|_ctx, a: Article| Ok(a));

        resource.hooks().build();
        assert!(resource.hooks().has_hooks(HookPoint::BeforeUpdate));
        assert!(!resource.hooks().has_hooks(HookPoint::BeforeDelete));
    }
}
