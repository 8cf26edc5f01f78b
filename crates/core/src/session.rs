//! Shared authentication session.
//!
//! One process-wide session replaces ad hoc token reads: login stores
//! the bearer token, logout clears it, and every collaborator reads a
//! snapshot at the moment it needs one. The handle is cheap to clone
//! and safe to share across tasks.

use std::sync::{Arc, PoisonError, RwLock};

/// Cloneable handle to the process-wide bearer token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// An unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session pre-populated with a token (e.g. from configuration).
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    /// Store the token obtained at login.
    pub fn set_token(&self, token: impl Into<String>) {
        *self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Drop the token at logout (or on a 401).
    pub fn clear(&self) {
        *self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Snapshot of the current token, if any.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
