pub mod credentials;
pub mod message;

pub use credentials::Credentials;
pub use message::{MessageBody, MessageSummary, UNKNOWN_SENDER};
