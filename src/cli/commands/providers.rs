//! `credvault providers` — list the supported provider tags.

use crate::cli::{print_json, Cli};
use crate::errors::Result;
use crate::vault::Provider;

/// Execute the `providers` command.
pub fn execute(cli: &Cli) -> Result<()> {
    if cli.json {
        return print_json(&Provider::ALL);
    }

    for provider in Provider::ALL {
        println!("{provider}");
    }

    Ok(())
}
