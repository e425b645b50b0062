//! Lifecycle hook pipelines for Plinth.
//!
//! A [`Hooks`] value holds the extension-point pipelines for one entity
//! type. Hooks are registered per [`HookPoint`] in plain ordered lists and
//! compiled into immutable snapshots on first execution; the point's
//! [`HookKind`] decides whether a failure aborts the operation
//! ([`Hooks::execute`]) or is reported and absorbed
//! ([`Hooks::execute_after`]).
//!
//! # Example
//!
//! ```
//! use plinth_hooks::{HookError, HookPoint, Hooks};
//! use plinth_registry::Context;
//!
//! #[derive(Clone)]
//! struct User {
//!     email: String,
//! }
//!
//! let hooks: Hooks<User> = Hooks::new();
//! hooks.register(HookPoint::BeforeCreate, |_ctx, user: User| {
//!     if user.email.contains('@') {
//!         Ok(user)
//!     } else {
//!         Err(HookError::new("invalid email"))
//!     }
//! });
//!
//! let ctx = Context::new();
//! let user = User { email: "a@b.example".into() };
//! assert!(hooks.execute(&ctx, HookPoint::BeforeCreate, &user).is_ok());
//! ```

/// Hook registration, compilation, and execution.
pub mod hooks;

/// Extension points and failure policy.
pub mod point;

pub use hooks::{HookError, HookFn, Hooks};
pub use point::{HookKind, HookPoint};
