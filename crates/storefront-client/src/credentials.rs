//! Bearer credential sources.

use std::sync::{PoisonError, RwLock};

use zeroize::Zeroizing;

/// Source of the bearer token attached to authenticated calls.
///
/// Reads happen once per attempt and may run concurrently.
pub trait CredentialStore: Send + Sync {
    /// Current bearer token, if the user is signed in.
    fn bearer_token(&self) -> Option<String>;
}

/// Store that never yields a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialStore for NoCredentials {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Process-local token store, updated on sign-in and sign-out.
///
/// # Examples
/// ```
/// use storefront_client::{CredentialStore, InMemoryCredentials};
///
/// let store = InMemoryCredentials::default();
/// store.set("token-1");
/// assert_eq!(store.bearer_token().as_deref(), Some("token-1"));
/// store.clear();
/// assert!(store.bearer_token().is_none());
/// ```
#[derive(Default)]
pub struct InMemoryCredentials {
    token: RwLock<Option<Zeroizing<String>>>,
}

impl InMemoryCredentials {
    /// Create a store holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(Zeroizing::new(token.into()))),
        }
    }

    /// Replace the stored token.
    ///
    /// A lock poisoned by a panicking writer is recovered, so sign-in and
    /// sign-out always take effect.
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Zeroizing::new(token.into()));
    }

    /// Forget the stored token.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl std::fmt::Debug for InMemoryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCredentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl CredentialStore for InMemoryCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| token.as_str().to_owned())
            .filter(|token| !token.trim().is_empty())
    }
}
