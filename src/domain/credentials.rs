use std::fmt;

/// Login material for one account.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// `scheme://[user:pass@]host:port`
    pub proxy: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            proxy: None,
        }
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("proxy", &self.proxy)
            .finish()
    }
}
