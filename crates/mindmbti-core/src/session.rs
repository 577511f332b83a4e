// Explicit session context: the bearer token the API client attaches to
// authenticated requests. Shared by cloning; written only on login/logout.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Bearer token returned by `/auth/login`. `Debug` never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token. Blank strings are not tokens.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(AuthToken(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Handle to the current authentication state.
///
/// Cloning yields another handle to the same state, so the orchestrator and
/// the API client observe the same token.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    token: Arc<RwLock<Option<AuthToken>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Option<AuthToken>) -> Self {
        SessionContext {
            token: Arc::new(RwLock::new(token)),
        }
    }

    pub fn token(&self) -> Option<AuthToken> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: AuthToken) {
        self.replace(Some(token));
    }

    pub fn clear(&self) {
        self.replace(None);
    }

    fn replace(&self, value: Option<AuthToken>) {
        match self.token.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_rejected() {
        assert!(AuthToken::new("").is_none());
        assert!(AuthToken::new("   ").is_none());
    }

    #[test]
    fn token_is_trimmed_and_formatted_as_bearer() {
        let token = AuthToken::new(" abc.def \n").unwrap();
        assert_eq!(token.expose(), "abc.def");
        assert_eq!(token.bearer(), "Bearer abc.def");
    }

    #[test]
    fn debug_redacts_secret() {
        let token = AuthToken::new("super-secret").unwrap();
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret"));
        let ctx = SessionContext::with_token(Some(token));
        assert!(!format!("{ctx:?}").contains("super-secret"));
    }

    #[test]
    fn clones_share_state() {
        let ctx = SessionContext::new();
        let other = ctx.clone();
        assert!(!other.is_authenticated());

        ctx.set_token(AuthToken::new("T").unwrap());
        assert_eq!(other.token().unwrap().expose(), "T");

        other.clear();
        assert!(!ctx.is_authenticated());
    }
}
