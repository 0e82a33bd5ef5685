//! Full-screen TUI for chatdeck.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
use chatdeck_core::config::Config;
pub use runtime::TuiRuntime;

/// Runs the interactive chat loop.
pub async fn run_interactive_chat(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Chat mode requires a terminal.\n\
             Use `chatdeck exec --prompt '...'` for non-interactive execution."
        );
    }

    let mut runtime = TuiRuntime::new(config.clone())?;
    let result = runtime.run();
    drop(runtime);
    result?;

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
