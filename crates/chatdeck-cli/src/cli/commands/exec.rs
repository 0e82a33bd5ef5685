//! Exec command handler.

use std::path::Path;

use anyhow::{Context, Result};
use chatdeck_core::config::Config;

use crate::modes;

pub struct ExecRunOptions<'a> {
    pub prompt: &'a str,
    pub image: Option<&'a Path>,
    pub json: bool,
    pub config: &'a Config,
}

pub async fn run(options: ExecRunOptions<'_>) -> Result<()> {
    let exec_opts = modes::exec::ExecOptions {
        prompt: options.prompt,
        image: options.image,
    };
    let session = modes::exec::run_exec(&exec_opts, options.config)
        .await
        .context("execute prompt")?;

    if options.json {
        let json = serde_json::to_string_pretty(&session).context("serialize session")?;
        println!("{json}");
    } else {
        print!("{}", modes::exec::format_transcript(&session));
    }
    Ok(())
}
