//! Core state and services for chatdeck.
//!
//! - [`manager`]: the session manager (chat store, active session, composer, search)
//! - [`session`]: sessions, messages and their ids
//! - [`attachment`]: inline image attachments
//! - [`responder`]: the reply backend seam
//! - [`prompts`]: landing view suggestions
//! - [`config`] / [`logging`]: ambient setup

pub mod attachment;
pub mod config;
pub mod logging;
pub mod manager;
pub mod prompts;
pub mod responder;
pub mod session;

pub use manager::{Composer, ReplyTicket, SessionManager};
pub use session::{Author, Message, MessageId, Session, SessionId};
