/// Account hash the provider uses for unauthenticated requests.
pub const GUEST_ACCOUNT_HASH: &str = "0";

/// Identity of the conversation with the server.
///
/// Owned by exactly one [`WebMail`](crate::webmail::WebMail); every mutation
/// goes through `&mut`, so one client must not be shared across threads
/// without external locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub security_token: Option<String>,
    pub account_hash: String,
    pub authenticated: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            security_token: None,
            account_hash: GUEST_ACCOUNT_HASH.to_string(),
            authenticated: false,
        }
    }
}

impl SessionState {
    pub fn is_guest_scope(&self) -> bool {
        self.account_hash == GUEST_ACCOUNT_HASH
    }

    /// Apply a decoded bootstrap payload.
    ///
    /// The token is replaced unconditionally (even by `None`); the account
    /// hash only when the server sent a non-empty one.
    pub fn apply_app_data(&mut self, token: Option<String>, account_hash: Option<String>) {
        self.security_token = token;
        if let Some(hash) = account_hash.filter(|h| !h.is_empty()) {
            self.account_hash = hash;
        }
    }

    pub(crate) fn token_field(&self) -> Option<(&'static str, String)> {
        self.security_token
            .as_ref()
            .map(|t| ("XToken", t.clone()))
    }
}
