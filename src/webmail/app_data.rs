use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};

static INIT_APP_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"window\.__initAppData\((.*)\);").expect("app data pattern is a valid regex")
});

/// Structured view of the bootstrap payload.
#[derive(Debug, Clone)]
pub struct AppData {
    /// `System.token`
    pub token: Option<String>,
    /// `AuthAccountHash`, only when non-empty.
    pub account_hash: Option<String>,
    pub payload: Value,
}

/// Extract and parse the JSON embedded in a bootstrap document.
pub fn decode_app_data(document: &str) -> Result<AppData> {
    let json = INIT_APP_DATA_RE
        .captures(document)
        .and_then(|c| c.get(1))
        .ok_or(Error::MissingAppData)?
        .as_str();

    let payload: Value = serde_json::from_str(json)?;

    let token = payload
        .get("System")
        .and_then(|s| s.get("token"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let account_hash = payload
        .get("AuthAccountHash")
        .and_then(Value::as_str)
        .filter(|h| !h.is_empty())
        .map(str::to_string);

    Ok(AppData {
        token,
        account_hash,
        payload,
    })
}
