//! Chat command handler.

use anyhow::{Context, Result};
use chatdeck_core::config::Config;

use crate::modes;

pub async fn run(config: &Config) -> Result<()> {
    modes::run_interactive_chat(config)
        .await
        .context("interactive chat failed")
}
