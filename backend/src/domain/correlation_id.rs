//! Request-scoped correlation identifier linking logs and client-visible errors.
//!
//! `CorrelationId` follows a request through the system. It uses task-local
//! storage so the current identifier is available to handlers, domain errors
//! and middleware without explicit parameter threading.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`CorrelationId::scope`] when spawning new tasks or moving work onto
//! blocking threads to keep the active identifier in scope.

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Longest identifier accepted from clients.
pub const CORRELATION_ID_MAX_LEN: usize = 128;

task_local! {
    static CORRELATION_ID: CorrelationId;
}

/// Validation failures raised when parsing a [`CorrelationId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorrelationIdError {
    /// The identifier is empty once trimmed.
    #[error("correlation id must not be empty")]
    Empty,
    /// The identifier exceeds [`CORRELATION_ID_MAX_LEN`].
    #[error("correlation id must be at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
    /// The identifier contains a character outside the permitted set.
    #[error("correlation id contains invalid character {character:?}")]
    InvalidCharacter { character: char },
}

/// Per-request correlation identifier.
///
/// Accepts client-supplied identifiers such as `1718000000000-k3j9x0a1b`
/// as well as server-generated UUIDs. Only ASCII alphanumerics and `-`, `_`,
/// `.`, `:` are permitted so the value is always a valid header.
///
/// # Examples
/// ```
/// use backend::domain::CorrelationId;
///
/// let id = CorrelationId::parse("abc-123").expect("valid id");
/// assert_eq!(id.as_str(), "abc-123");
/// assert!(CorrelationId::parse("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Validate and wrap an identifier.
    pub fn parse(raw: &str) -> Result<Self, CorrelationIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CorrelationIdError::Empty);
        }
        let actual = trimmed.chars().count();
        if actual > CORRELATION_ID_MAX_LEN {
            return Err(CorrelationIdError::TooLong {
                max: CORRELATION_ID_MAX_LEN,
                actual,
            });
        }
        if let Some(character) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
        {
            return Err(CorrelationIdError::InvalidCharacter { character });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the current identifier if one is in scope.
    #[must_use]
    pub fn current() -> Option<Self> {
        CORRELATION_ID.try_with(Clone::clone).ok()
    }

    /// Returns the in-scope identifier or a freshly generated one.
    #[must_use]
    pub fn current_or_generate() -> Self {
        Self::current().unwrap_or_else(Self::generate)
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Execute the provided future with the supplied identifier in scope.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::CorrelationId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = CorrelationId::parse("abc-123").expect("valid id");
    /// let observed = CorrelationId::scope(id.clone(), async { CorrelationId::current() }).await;
    /// assert_eq!(observed, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(id: CorrelationId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CORRELATION_ID.scope(id, fut).await
    }

    /// Run a synchronous closure with the supplied identifier in scope.
    pub fn sync_scope<R>(id: CorrelationId, f: impl FnOnce() -> R) -> R {
        CORRELATION_ID.sync_scope(id, f)
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CorrelationId {
    type Err = CorrelationIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
