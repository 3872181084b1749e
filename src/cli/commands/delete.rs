//! `credvault delete` — permanently remove a credential.

use dialoguer::Confirm;

use crate::audit::{log_audit, AuditEvent};
use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let vault = open_vault(cli)?;

    // Look it up first so the prompt can name it and a bad id fails early.
    let existing = vault.get(id)?;
    let m = &existing.metadata;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete credential '{}' ({} / {})?",
                m.name, m.provider, m.environment
            ))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.delete(id)?;

    log_audit(
        cli,
        AuditEvent::new("delete")
            .credential(id)
            .pair(m.provider.as_str(), &m.environment),
    );
    output::success(&format!("Deleted credential '{}'", m.name));

    Ok(())
}
