use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback sender for `From` fields we cannot resolve.
pub const UNKNOWN_SENDER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSummary {
    pub uid: Option<String>,
    pub subject: Option<String>,
    pub from: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBody {
    pub html: Option<String>,
    pub plain: Option<String>,
}

impl MessageBody {
    pub fn from_result(result: &Value) -> Option<Self> {
        let obj = result.as_object()?;
        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            html: text("Html"),
            plain: text("Plain"),
        })
    }

    /// HTML if non-empty, else plain text if non-empty, else "".
    pub fn preferred(&self) -> &str {
        self.html
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.plain.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("")
    }

    pub fn is_html(&self) -> bool {
        self.html.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Sender {
    #[serde(rename = "Email")]
    email: Option<String>,
}

/// The shapes the provider uses for a message's `From` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SenderField {
    List(Vec<Sender>),
    Collection {
        #[serde(rename = "@Collection")]
        collection: Vec<Sender>,
    },
    Other(serde::de::IgnoredAny),
}

impl SenderField {
    fn first_email(self) -> Option<String> {
        match self {
            Self::List(senders) | Self::Collection { collection: senders } => {
                senders.into_iter().next().and_then(|s| s.email)
            }
            Self::Other(_) => None,
        }
    }
}

/// Resolve a raw `From` value to an address, `"Unknown"` for any other shape.
pub fn normalize_sender(raw: Option<&Value>) -> String {
    raw.filter(|v| !v.is_null())
        .and_then(|v| SenderField::deserialize(v).ok())
        .and_then(SenderField::first_email)
        .unwrap_or_else(|| UNKNOWN_SENDER.to_string())
}

fn scalar_string(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl MessageSummary {
    /// Normalize one entry of a `MessageList` collection; `None` for non-objects.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let obj = entry.as_object()?;
        Some(Self {
            uid: scalar_string(obj.get("Uid")),
            subject: obj.get("Subject").and_then(Value::as_str).map(str::to_string),
            from: normalize_sender(obj.get("From")),
            date: scalar_string(obj.get("DateRaw")),
        })
    }
}

/// Python-style truthiness of an envelope `Result`.
pub fn is_truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
