use std::io;

use anyhow::Context;
use shell::commands::Shell;
use shell::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .format_timestamp(None)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(AppState::new(), stdin.lock(), stdout.lock());
    shell.run().context("terminal I/O failed")?;
    Ok(())
}
