//! Share capability tokens: issuing, validation, and bounded consumption.

pub mod service;
pub mod token;

pub use service::{IssueShareRequest, ShareAccess, ShareService};
pub use token::TokenGenerator;
