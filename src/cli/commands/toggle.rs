//! `credvault toggle` — flip a credential between active and inactive.

use crate::audit::{log_audit, AuditEvent};
use crate::cli::output;
use crate::cli::{open_vault, print_json, Cli};
use crate::errors::Result;

/// Execute the `toggle` command.
pub fn execute(cli: &Cli, id: &str) -> Result<()> {
    let vault = open_vault(cli)?;
    let toggled = vault.toggle_active(id)?;
    let m = &toggled.metadata;

    let state = if m.is_active { "active" } else { "inactive" };
    log_audit(
        cli,
        AuditEvent::new("toggle")
            .credential(&m.id)
            .pair(m.provider.as_str(), &m.environment)
            .details(state),
    );

    if cli.json {
        return print_json(&toggled);
    }

    output::success(&format!("Credential '{}' is now {state}", m.name));

    Ok(())
}
