/// Result of checking an admin password entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Nothing was entered; show neither an error nor admin content.
    Empty,
    Granted,
    Denied,
}

pub trait Authenticator: Send + Sync {
    fn check(&self, attempt: &str) -> AuthOutcome;
}

/// Exact-match gate against one shared secret. Not a security boundary.
pub struct SharedSecretAuthenticator {
    secret: String,
}

impl SharedSecretAuthenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }
}

impl Authenticator for SharedSecretAuthenticator {
    fn check(&self, attempt: &str) -> AuthOutcome {
        if attempt.is_empty() {
            AuthOutcome::Empty
        } else if attempt == self.secret {
            AuthOutcome::Granted
        } else {
            AuthOutcome::Denied
        }
    }
}
