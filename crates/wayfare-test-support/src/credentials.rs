//! Test credential stores — deterministic `CredentialStore` implementations.

use wayfare_core::client::CredentialStore;

/// A credential store that always returns the configured token.
#[derive(Debug, Clone)]
pub struct FixedCredentials(pub Option<String>);

impl FixedCredentials {
    /// A store holding a valid-looking bearer token.
    #[must_use]
    pub fn signed_in() -> Self {
        Self(Some("test-bearer-token".to_owned()))
    }

    /// A store holding no token.
    #[must_use]
    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl CredentialStore for FixedCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
