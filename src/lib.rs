//! Client for the steamwebmail.com AJAX backend: session bootstrap, login,
//! folder and message listing, and message bodies.

pub mod auth;
pub mod config;
pub mod daemon;
pub mod domain;
pub mod error;
pub mod mail;
pub mod session;
pub mod webmail;

pub use domain::{Credentials, MessageBody, MessageSummary};
pub use error::{Error, Result};
pub use session::{GUEST_ACCOUNT_HASH, SessionState};
pub use webmail::{HttpTransport, Transport, TransportConfig, WebMail};
