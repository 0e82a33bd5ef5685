pub mod chat;
pub mod config;
pub mod exec;
pub mod prompts;
