//! Runtime execution modes.
//!
//! - `exec`: one headless send/reply round trip
//! - `tui`: full-screen interactive terminal UI (optional feature)

pub mod exec;

#[cfg(feature = "tui")]
pub use chatdeck_tui::run_interactive_chat;

#[cfg(not(feature = "tui"))]
pub async fn run_interactive_chat(_config: &chatdeck_core::config::Config) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
