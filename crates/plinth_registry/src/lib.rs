//! Capability-gated service registry for Plinth.
//!
//! The registry is a process-wide locator with an explicit two-phase
//! lifecycle: [`start()`](Registry::start) opens it for registration and
//! mints the single [`Key`] that authorizes privileged calls;
//! [`freeze()`](Registry::freeze) closes registration. Lookups through
//! [`use_service()`](Registry::use_service) are gated by [`Guard`]s, the
//! most common of which is a [`Token`] allow-list built with [`require`].
//!
//! There is no ambient global: the registry is an application-owned object
//! (usually an `Arc<Registry>`) handed to each component at construction.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use plinth_registry::{Context, Registry, Token};
//!
//! struct Mailer;
//!
//! let registry = Registry::new();
//! let key = registry.start();
//! let ops = Token::new("ops");
//!
//! registry.register(&key, Mailer).restrict([ops.clone()]);
//! registry.freeze(&key);
//!
//! let ctx = Context::new().with_token(ops);
//! let mailer: Arc<Mailer> = registry.use_service(&ctx).unwrap();
//! ```

/// Request context carrying caller credentials and typed values.
pub mod context;

/// Access guards and the token allow-list guard.
pub mod guard;

/// The registry, its lifecycle, and its errors.
pub mod registry;

/// Unforgeable capability tokens.
pub mod token;

pub use context::Context;
pub use guard::{Guard, GuardError, require};
pub use registry::{ContractId, Handle, Key, Registry, RegistryError, ServiceInfo};
pub use token::Token;
