//! `credvault stats` — credential counts and per-provider breakdown.

use crate::cli::output;
use crate::cli::{open_vault, print_json, settings, Cli};
use crate::errors::Result;

/// Execute the `stats` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    let stats = vault.stats()?;

    if cli.json {
        return print_json(&stats);
    }

    output::print_stats(&stats, settings()?.recent_usage_days);

    Ok(())
}
