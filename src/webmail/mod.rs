pub mod app_data;
pub mod transport;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use serde_json::Value;

use crate::domain::message::is_truthy;
use crate::domain::{Credentials, MessageBody, MessageSummary};
use crate::error::{Error, Result};
use crate::session::{GUEST_ACCOUNT_HASH, SessionState};

pub use app_data::{AppData, decode_app_data};
pub use transport::{DEFAULT_TIMEOUT, HttpTransport, Transport, TransportConfig};

pub const DEFAULT_BASE_URL: &str = "https://steamwebmail.com/";

/// Client for the steamwebmail AJAX backend.
///
/// Every call blocks until the server answers or the transport times out.
/// The session is mutable state owned by this value: use one client per
/// logical session and do not share it across threads without a lock.
pub struct WebMail<T: Transport = HttpTransport> {
    credentials: Credentials,
    base_url: String,
    session: SessionState,
    transport: T,
}

impl WebMail<HttpTransport> {
    pub fn new(credentials: Credentials) -> anyhow::Result<Self> {
        Self::connect(credentials, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Build a client over [`HttpTransport`], routed through the credentials' proxy.
    pub fn connect(
        credentials: Credentials,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(&TransportConfig {
            proxy: credentials.proxy.clone(),
            timeout,
        })?;
        Ok(Self::with_transport(credentials, base_url, transport))
    }
}

impl<T: Transport> WebMail<T> {
    pub fn with_transport(
        credentials: Credentials,
        base_url: impl Into<String>,
        transport: T,
    ) -> Self {
        Self {
            credentials,
            base_url: base_url.into(),
            session: SessionState::default(),
            transport,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn app_data_url(&self, timestamp_ms: u128) -> String {
        format!(
            "{}?/AppData@no-mobile-0/{}/{}/",
            self.base_url, self.session.account_hash, timestamp_ms
        )
    }

    fn ajax_url(&self, account_hash: &str) -> String {
        format!("{}?/Ajax/&q[]=/{}/", self.base_url, account_hash)
    }

    /// Fetch a fresh token (and, after login, the account hash).
    ///
    /// On any failure the session is left as it was.
    pub fn refresh(&mut self) -> Result<AppData> {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let url = self.app_data_url(timestamp_ms);
        debug!("GET {url}");

        let document = self.transport.get(&url).map_err(Error::Transport)?;
        let data = decode_app_data(&document)?;

        self.session
            .apply_app_data(data.token.clone(), data.account_hash.clone());
        Ok(data)
    }

    /// Log in with the stored credentials. Never panics, never returns an error.
    ///
    /// The additional (second factor) code is always submitted empty, so
    /// accounts that require one cannot log in.
    pub fn authenticate(&mut self) -> bool {
        info!("Attempting login for {}", self.credentials.email);
        match self.try_authenticate() {
            Ok(()) => {
                info!("Login succeeded for {}", self.credentials.email);
                true
            }
            Err(Error::LoginRejected(raw)) => {
                warn!("Login rejected for {}: {raw}", self.credentials.email);
                false
            }
            Err(e) => {
                warn!("Login failed for {}: {e}", self.credentials.email);
                false
            }
        }
    }

    fn try_authenticate(&mut self) -> Result<()> {
        self.refresh()?;

        let mut form = vec![
            ("Email", self.credentials.email.clone()),
            ("Login", String::new()),
            ("Password", self.credentials.password.clone()),
            ("Language", String::new()),
            ("AdditionalCode", String::new()),
            ("AdditionalCodeSignMe", "0".to_string()),
            ("SignMe", "0".to_string()),
            ("Action", "Login".to_string()),
        ];
        form.extend(self.session.token_field());

        let url = self.ajax_url(GUEST_ACCOUNT_HASH);
        debug!("POST {url} Action=Login");
        let raw = self
            .transport
            .post_form(&url, &form)
            .map_err(Error::Transport)?;
        let response: Value = serde_json::from_str(&raw)?;

        if response.get("Result") != Some(&Value::Bool(true)) {
            return Err(Error::LoginRejected(raw));
        }

        // The login reply never carries the account hash; only a second
        // bootstrap does.
        if let Err(e) = self.refresh() {
            warn!("Post-login refresh failed, account hash not updated: {e}");
        } else if self.session.is_guest_scope() {
            warn!("Post-login refresh returned no account hash");
        }
        self.session.authenticated = true;
        Ok(())
    }

    fn post_action(&self, action: &str, params: Vec<(&'static str, String)>) -> Result<Value> {
        let mut form = Vec::with_capacity(params.len() + 2);
        form.push(("Action", action.to_string()));
        form.extend(params);
        form.extend(self.session.token_field());

        let url = self.ajax_url(&self.session.account_hash);
        debug!("POST {url} Action={action}");
        let raw = self
            .transport
            .post_form(&url, &form)
            .map_err(Error::Transport)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Raw `Folders` envelope.
    pub fn get_folders(&self) -> Result<Value> {
        self.post_action("Folders", Vec::new())
            .inspect_err(|e| warn!("Folder listing failed: {e}"))
    }

    /// One page of `folder`, in server order. Failures and empty results both
    /// yield an empty list.
    pub fn get_messages(&self, folder: &str, page: u32) -> Vec<MessageSummary> {
        let params = vec![
            ("Folder", folder.to_string()),
            ("Page", page.to_string()),
            ("Offset", "0".to_string()),
            ("Search", String::new()),
        ];
        let data = match self.post_action("MessageList", params) {
            Ok(d) => d,
            Err(e) => {
                warn!("Message listing for {folder} failed: {e}");
                return Vec::new();
            }
        };

        let result = data.get("Result");
        if !is_truthy(result) {
            return Vec::new();
        }

        result
            .and_then(|r| r.get("@Collection"))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let summary = MessageSummary::from_entry(entry);
                        if summary.is_none() {
                            debug!("Skipping non-object message entry in {folder}");
                        }
                        summary
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Raw `Message` envelope: metadata, headers and body.
    pub fn get_message(&self, uid: &str, folder: &str) -> Result<Value> {
        self.post_action(
            "Message",
            vec![("Folder", folder.to_string()), ("Uid", uid.to_string())],
        )
        .inspect_err(|e| warn!("Fetching message {uid} in {folder} failed: {e}"))
    }

    /// Both body parts, or `None` when the message could not be fetched.
    pub fn get_message_content(&self, uid: &str, folder: &str) -> Option<MessageBody> {
        let data = self.get_message(uid, folder).ok()?;
        data.get("Result").and_then(MessageBody::from_result)
    }

    /// HTML body if present, else plain text, else "".
    pub fn get_message_body(&self, uid: &str, folder: &str) -> String {
        self.get_message_content(uid, folder)
            .map(|body| body.preferred().to_string())
            .unwrap_or_default()
    }
}
