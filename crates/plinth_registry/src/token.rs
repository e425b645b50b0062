//! Unforgeable capability tokens.
//!
//! A [`Token`] is a credential compared by identity, not by name. The
//! identity is a process-wide counter value assigned at creation and never
//! reused, and the field is private to this crate, so a token cannot be
//! forged from a string or rebuilt from serialized data. Holding a clone of
//! a token is holding the same credential.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of token identities. Starts at 1 so 0 never names a token.
static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

/// An unforgeable capability for service access.
///
/// Two tokens created with the same name are distinct credentials:
///
/// ```
/// use plinth_registry::Token;
///
/// let a = Token::new("handlers");
/// let b = Token::new("handlers");
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// ```
#[derive(Clone)]
pub struct Token {
    /// Process-unique identity; the only input to equality and hashing.
    id: u64,
    /// Human-readable name for diagnostics only.
    name: Arc<str>,
}

impl Token {
    /// Creates a new token with the given name.
    ///
    /// The name is for debugging and diagnostics; it plays no part in
    /// identity.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// Returns the token's diagnostic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

impl core::hash::Hash for Token {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn same_name_different_identity() {
        let a = Token::new("test");
        let b = Token::new("test");
        assert_ne!(a, b);
    }

    #[test]
    fn clone_shares_identity() {
        let a = Token::new("test");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn display_is_name() {
        let token = Token::new("handlers");
        assert_eq!(token.to_string(), "handlers");
        assert_eq!(token.name(), "handlers");
    }

    #[test]
    fn hash_follows_identity() {
        let a = Token::new("x");
        let b = a.clone();
        let c = Token::new("x");

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }
}
