//! The registry: lifecycle, registration, and guarded lookup.
//!
//! Lifecycle is a one-way state machine: `Unstarted -> Open -> Frozen`.
//! [`Registry::start`] performs the first transition and mints the single
//! [`Key`]; [`Registry::freeze`] performs the second. Misusing the lifecycle
//! (starting twice, registering before start or after freeze, freezing with
//! a foreign key) is a wiring bug in the application's composition root and
//! panics loudly rather than returning an error.
//!
//! Lookups never panic: [`Registry::use_service`] returns a
//! [`RegistryError`] for missing contracts and guard denials.

use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;
use thiserror::Error;

use plinth_events::{Diagnostic, EventSink, TracingSink};

use crate::context::Context;
use crate::guard::{Guard, GuardError, require};
use crate::token::Token;

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle phases
// ─────────────────────────────────────────────────────────────────────────────

const UNSTARTED: u8 = 0;
const OPEN: u8 = 1;
const FROZEN: u8 = 2;

/// Source of key identities across all registries in the process.
/// Starts at 1 so 0 never names a key.
static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(1);

// ─────────────────────────────────────────────────────────────────────────────
// ContractId
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of a service contract: the Rust type it is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractId {
    type_id: TypeId,
    type_name: &'static str,
}

impl ContractId {
    /// Returns the contract identity for type `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the contract's type name, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Key
// ─────────────────────────────────────────────────────────────────────────────

/// The single credential authorizing registration and freezing.
///
/// Minted exactly once per registry by [`Registry::start`]. Deliberately
/// neither `Clone` nor `Copy`: whoever holds the key is the composition
/// root, and the type system keeps it from leaking into request paths.
pub struct Key {
    id: u64,
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The id stays out of Debug output so logs cannot leak it.
        f.write_str("Key(..)")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failure of a registry lookup or privileged query.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No implementation is registered for the contract.
    #[error("no service registered for contract {0}")]
    NotFound(&'static str),

    /// A guard refused the lookup.
    #[error("access to {contract} denied")]
    AccessDenied {
        /// Type name of the guarded contract.
        contract: &'static str,
        /// The refusing guard's error.
        #[source]
        source: GuardError,
    },

    /// A privileged query presented a key this registry did not mint.
    #[error("key was not minted by this registry")]
    InvalidKey,
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// One registered service and its access guards.
struct Entry {
    contract: ContractId,
    /// Which registration produced this entry; handles carry the same
    /// stamp so a handle from a replaced registration cannot touch the
    /// replacement.
    generation: u64,
    service: Arc<dyn Any + Send + Sync>,
    guards: Vec<Guard>,
}

/// Description of one registered service, as returned by
/// [`Registry::services`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Type name of the registered contract.
    pub contract: &'static str,
    /// Number of guards attached to the entry.
    pub guards: usize,
}

/// A capability-gated service registry with a two-phase lifecycle.
///
/// The registry is an owned object, typically wrapped in an `Arc` and handed
/// to each component at construction. See the crate docs for the lifecycle
/// walkthrough.
pub struct Registry {
    phase: AtomicU8,
    /// Identity of the key minted by `start`; 0 until then.
    key_id: AtomicU64,
    /// Stamp for the most recent registration.
    generation: AtomicU64,
    entries: RwLock<HashMap<TypeId, Entry>>,
    sink: Arc<dyn EventSink>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase.load(Ordering::Acquire) {
            UNSTARTED => "Unstarted",
            OPEN => "Open",
            _ => "Frozen",
        };
        f.debug_struct("Registry")
            .field("phase", &phase)
            .field("services", &self.entries.read().len())
            .finish()
    }
}

impl Registry {
    /// Creates an unstarted registry emitting through [`TracingSink`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    /// Creates an unstarted registry emitting through the given sink.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self {
            phase: AtomicU8::new(UNSTARTED),
            key_id: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            entries: RwLock::new(HashMap::new()),
            sink,
        }
    }

    /// Opens the registry for registration and mints its [`Key`].
    ///
    /// # Panics
    ///
    /// Panics if the registry was already started. A second `start` means
    /// two composition roots are fighting over one registry, which is never
    /// recoverable at runtime.
    #[must_use = "the key is minted exactly once; dropping it locks the registry out of registration"]
    pub fn start(&self) -> Key {
        if self
            .phase
            .compare_exchange(UNSTARTED, OPEN, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            panic!("registry already started; start() must be called exactly once");
        }
        let id = NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed);
        self.key_id.store(id, Ordering::Release);
        Key { id }
    }

    fn check_key(&self, key: &Key) -> bool {
        key.id == self.key_id.load(Ordering::Acquire)
    }

    /// Registers `service` as the implementation of contract `T`.
    ///
    /// While the registry is open, registering the same contract again
    /// replaces the previous implementation and discards its guards. The
    /// returned [`Handle`] attaches guards to the new entry.
    ///
    /// # Panics
    ///
    /// Panics if the registry is not open (not yet started, or already
    /// frozen) or if `key` was not minted by this registry.
    pub fn register<T: Send + Sync + 'static>(&self, key: &Key, service: T) -> Handle<'_, T> {
        match self.phase.load(Ordering::Acquire) {
            OPEN => {}
            UNSTARTED => panic!("cannot register before start()"),
            _ => panic!("cannot register after freeze()"),
        }
        assert!(self.check_key(key), "register() called with a foreign key");

        let contract = ContractId::of::<T>();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries.write().insert(
            contract.type_id,
            Entry {
                contract,
                generation,
                service: Arc::new(service),
                guards: Vec::new(),
            },
        );
        self.sink.emit(&Diagnostic::Registration {
            contract: contract.type_name,
        });

        Handle {
            registry: self,
            contract,
            generation,
            _marker: PhantomData,
        }
    }

    /// Closes registration. Guard lists and the service set are final after
    /// this returns.
    ///
    /// # Panics
    ///
    /// Panics if the registry is not open or if `key` was not minted by
    /// this registry.
    pub fn freeze(&self, key: &Key) {
        assert!(self.check_key(key), "freeze() called with a foreign key");
        if self
            .phase
            .compare_exchange(OPEN, FROZEN, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            panic!("freeze() requires an open registry");
        }
    }

    /// Returns true once [`freeze`](Self::freeze) has run.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.phase.load(Ordering::Acquire) == FROZEN
    }

    /// Resolves the implementation of contract `T`, running its guards in
    /// attachment order.
    ///
    /// The first refusing guard short-circuits evaluation and the lookup
    /// fails with [`RegistryError::AccessDenied`]. An unregistered contract
    /// fails with [`RegistryError::NotFound`].
    pub fn use_service<T: Send + Sync + 'static>(
        &self,
        ctx: &Context,
    ) -> Result<Arc<T>, RegistryError> {
        let contract = ContractId::of::<T>();
        let entries = self.entries.read();

        let Some(entry) = entries.get(&contract.type_id) else {
            drop(entries);
            self.sink.emit(&Diagnostic::NotFound {
                contract: contract.type_name,
            });
            return Err(RegistryError::NotFound(contract.type_name));
        };

        for guard in &entry.guards {
            if let Err(source) = guard(ctx) {
                drop(entries);
                self.sink.emit(&Diagnostic::AccessDenied {
                    contract: contract.type_name,
                    error: source.to_string(),
                });
                return Err(RegistryError::AccessDenied {
                    contract: contract.type_name,
                    source,
                });
            }
        }

        let service = Arc::clone(&entry.service);
        drop(entries);

        let service = service.downcast::<T>().unwrap_or_else(|_| {
            panic!("registered service does not match its contract type (this is a bug)")
        });
        self.sink.emit(&Diagnostic::AccessGranted {
            contract: contract.type_name,
        });
        Ok(service)
    }

    /// Like [`use_service`](Self::use_service), for services the
    /// application cannot run without.
    ///
    /// # Panics
    ///
    /// Panics if the lookup fails for any reason.
    #[must_use]
    pub fn must_use<T: Send + Sync + 'static>(&self, ctx: &Context) -> Arc<T> {
        match self.use_service::<T>(ctx) {
            Ok(service) => service,
            Err(err) => panic!("required service unavailable: {err}"),
        }
    }

    /// Lists every registered service, sorted by contract name.
    ///
    /// This is a privileged introspection query and requires the registry's
    /// key; a foreign key fails with [`RegistryError::InvalidKey`] rather
    /// than panicking, since introspection tooling should degrade, not
    /// crash.
    pub fn services(&self, key: &Key) -> Result<Vec<ServiceInfo>, RegistryError> {
        if !self.check_key(key) {
            return Err(RegistryError::InvalidKey);
        }
        let entries = self.entries.read();
        let mut infos: Vec<ServiceInfo> = entries
            .values()
            .map(|entry| ServiceInfo {
                contract: entry.contract.type_name,
                guards: entry.guards.len(),
            })
            .collect();
        infos.sort_by_key(|info| info.contract);
        Ok(infos)
    }

    fn push_guard(&self, contract: ContractId, generation: u64, guard: Guard) {
        assert!(
            self.phase.load(Ordering::Acquire) == OPEN,
            "guards can only be attached while the registry is open"
        );
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(&contract.type_id)
            .expect("handle outlived its entry (this is a bug)");
        assert!(
            entry.generation == generation,
            "stale handle: its registration was replaced"
        );
        entry.guards.push(guard);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Attaches guards to a freshly registered entry.
///
/// Returned by [`Registry::register`]; methods chain and each appends one
/// guard, evaluated later in this same order. A handle is bound to the
/// registration that produced it: if the contract is re-registered, the
/// old handle goes stale and refuses to touch the replacement.
pub struct Handle<'a, T> {
    registry: &'a Registry,
    contract: ContractId,
    generation: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Handle<'_, T> {
    /// Appends a custom guard to the entry.
    ///
    /// # Panics
    ///
    /// Panics if the registry has been frozen or the entry was replaced by
    /// a later registration.
    pub fn guard(self, guard: impl Fn(&Context) -> Result<(), GuardError> + Send + Sync + 'static) -> Self {
        self.registry
            .push_guard(self.contract, self.generation, Box::new(guard));
        self
    }

    /// Appends a token allow-list guard to the entry.
    ///
    /// Shorthand for `guard(require(tokens))`.
    ///
    /// # Panics
    ///
    /// Panics if the registry has been frozen or the entry was replaced by
    /// a later registration.
    pub fn restrict(self, tokens: impl IntoIterator<Item = Token>) -> Self {
        self.registry
            .push_guard(self.contract, self.generation, require(tokens));
        self
    }

    /// Returns the identity of the contract this handle belongs to.
    #[must_use]
    pub fn contract(&self) -> ContractId {
        self.contract
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test support
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(any(test, feature = "test-support"))]
impl Registry {
    /// Returns the registry to its unstarted state, discarding every entry
    /// and invalidating the minted key.
    ///
    /// Only available to tests (or with the `test-support` feature).
    /// Production code never walks the lifecycle backwards.
    pub fn reset(&self) {
        self.entries.write().clear();
        self.key_id.store(0, Ordering::Release);
        self.phase.store(UNSTARTED, Ordering::Release);
    }

    /// Removes the entry for contract `T`, if any.
    ///
    /// Only available to tests (or with the `test-support` feature).
    pub fn unregister<T: Send + Sync + 'static>(&self, key: &Key) {
        assert!(self.check_key(key), "unregister() called with a foreign key");
        self.entries.write().remove(&TypeId::of::<T>());
    }
}
