//! Request context passed to lookups and hook executions.
//!
//! A [`Context`] carries whatever the caller wants guards and hooks to see:
//! at most one capability [`Token`], plus arbitrary typed values keyed by
//! type (one value per type, in the style of a type map). Neither the
//! registry nor the hook pipelines interpret the values; cancellation or
//! deadline state travels the same way and is honored by the hooks
//! themselves.

use core::any::{Any, TypeId};
use hashbrown::HashMap;

use crate::token::Token;

/// Context for a single request or operation.
///
/// # Example
///
/// ```
/// use plinth_registry::{Context, Token};
///
/// struct RequestId(&'static str);
///
/// let token = Token::new("handlers");
/// let ctx = Context::new()
///     .with_token(token.clone())
///     .with_value(RequestId("req-1"));
///
/// assert_eq!(ctx.token(), Some(&token));
/// assert_eq!(ctx.get::<RequestId>().unwrap().0, "req-1");
/// ```
#[derive(Default)]
pub struct Context {
    /// The caller's capability token, if any. Setting a new one replaces it.
    token: Option<Token>,
    /// Typed values, one per type.
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a capability token, replacing any previous one.
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Returns the caller's token, if one was attached.
    #[must_use]
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Attaches a typed value, replacing any previous value of the same type.
    #[must_use]
    pub fn with_value<V: Send + Sync + 'static>(mut self, value: V) -> Self {
        self.insert(value);
        self
    }

    /// Inserts a typed value, replacing any previous value of the same type.
    pub fn insert<V: Send + Sync + 'static>(&mut self, value: V) {
        self.values.insert(TypeId::of::<V>(), Box::new(value));
    }

    /// Returns the value of type `V`, if one was attached.
    #[must_use]
    pub fn get<V: Send + Sync + 'static>(&self) -> Option<&V> {
        self.values
            .get(&TypeId::of::<V>())
            .and_then(|boxed| boxed.downcast_ref::<V>())
    }

    /// Returns true if a value of type `V` was attached.
    #[must_use]
    pub fn contains<V: Send + Sync + 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<V>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Deadline(u64);
    struct Tenant(String);

    #[test]
    fn empty_context_has_no_token() {
        let ctx = Context::new();
        assert!(ctx.token().is_none());
    }

    #[test]
    fn with_token_round_trip() {
        let token = Token::new("test");
        let ctx = Context::new().with_token(token.clone());
        assert_eq!(ctx.token(), Some(&token));
    }

    #[test]
    fn with_token_replaces_previous() {
        let first = Token::new("first");
        let second = Token::new("second");

        let ctx = Context::new()
            .with_token(first.clone())
            .with_token(second.clone());

        assert_eq!(ctx.token(), Some(&second));
        assert_ne!(ctx.token(), Some(&first));
    }

    #[test]
    fn typed_values_round_trip() {
        let ctx = Context::new()
            .with_value(Deadline(30))
            .with_value(Tenant("acme".into()));

        assert_eq!(ctx.get::<Deadline>().unwrap().0, 30);
        assert_eq!(ctx.get::<Tenant>().unwrap().0, "acme");
        assert!(ctx.contains::<Deadline>());
        assert!(!ctx.contains::<u64>());
    }

    #[test]
    fn value_of_same_type_replaces() {
        let ctx = Context::new().with_value(Deadline(30)).with_value(Deadline(60));
        assert_eq!(ctx.get::<Deadline>().unwrap().0, 60);
    }
}
