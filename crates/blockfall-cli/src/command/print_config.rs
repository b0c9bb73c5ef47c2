use std::io::{self, Write as _};

use anyhow::Context as _;

use crate::command::config::ConfigArg;

pub(crate) fn run(arg: &ConfigArg) -> anyhow::Result<()> {
    let config = arg.resolve()?;
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &config).context("Failed to write config")?;
    writeln!(stdout).context("Failed to write config")?;
    Ok(())
}
