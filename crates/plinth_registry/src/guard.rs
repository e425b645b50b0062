//! Access guards.
//!
//! A [`Guard`] is a predicate over the request [`Context`] deciding whether
//! a resolved service may be returned. Guards on one entry are AND-combined
//! and evaluated in attachment order; the first failure short-circuits.
//!
//! [`require`] builds the common guard: a token allow-list. A context must
//! carry one of the named tokens, compared by identity.

use thiserror::Error;

use crate::context::Context;
use crate::token::Token;

// ─────────────────────────────────────────────────────────────────────────────
// GuardError
// ─────────────────────────────────────────────────────────────────────────────

/// Why a guard refused access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// The entry requires a token and the context carried none.
    #[error("token required")]
    TokenRequired,

    /// The context carried a token that is not on the allow-list.
    #[error("token {name:?} does not grant access")]
    TokenRejected {
        /// Diagnostic name of the rejected token.
        name: String,
    },

    /// A custom guard refused access.
    #[error("access denied: {0}")]
    Denied(String),
}

impl GuardError {
    /// Creates a [`GuardError::Denied`] with the given reason.
    #[must_use]
    pub fn denied(reason: impl Into<String>) -> Self {
        GuardError::Denied(reason.into())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Guard
// ─────────────────────────────────────────────────────────────────────────────

/// A validation function that permits or denies service access.
///
/// Guards must be fast, synchronous checks against the context; there is no
/// timeout layer around evaluation, so a slow guard stalls the resolving
/// caller.
pub type Guard = Box<dyn Fn(&Context) -> Result<(), GuardError> + Send + Sync>;

/// Returns a guard that admits any of the given tokens.
///
/// Evaluation: a context with no token fails with
/// [`GuardError::TokenRequired`]; a context whose token identity-matches one
/// of the allowed tokens passes; anything else fails with
/// [`GuardError::TokenRejected`]. This is strictly an allow-list OR; names
/// never match, only identities.
///
/// # Example
///
/// ```
/// use plinth_registry::{Context, Token, require};
///
/// let handlers = Token::new("handlers");
/// let ingest = Token::new("ingest");
/// let guard = require([handlers.clone(), ingest]);
///
/// let ctx = Context::new().with_token(handlers);
/// assert!(guard(&ctx).is_ok());
/// assert!(guard(&Context::new()).is_err());
/// ```
pub fn require(tokens: impl IntoIterator<Item = Token>) -> Guard {
    let allowed: Vec<Token> = tokens.into_iter().collect();
    Box::new(move |ctx: &Context| {
        let Some(token) = ctx.token() else {
            return Err(GuardError::TokenRequired);
        };
        if allowed.iter().any(|t| t == token) {
            Ok(())
        } else {
            Err(GuardError::TokenRejected {
                name: token.name().to_string(),
            })
        }
    })
}
