//! `credvault update` — edit credential fields or rotate its secret.

use crate::audit::{log_audit, AuditEvent};
use crate::cli::output;
use crate::cli::{open_vault, print_json, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::CredentialPatch;

/// Execute the `update` command.
pub fn execute(cli: &Cli, id: &str, patch: CredentialPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(VaultError::Validation(
            "nothing to update — pass at least one field".into(),
        ));
    }
    if patch.secret.is_some() {
        output::warning("Secret provided on command line — it may appear in shell history.");
    }

    let vault = open_vault(cli)?;
    let rotated = patch.secret.is_some();
    let updated = vault.update(id, patch)?;
    let m = &updated.metadata;

    log_audit(
        cli,
        AuditEvent::new("update")
            .credential(&m.id)
            .pair(m.provider.as_str(), &m.environment)
            .details(if rotated { "secret rotated" } else { "metadata" }),
    );

    if cli.json {
        return print_json(&updated);
    }

    output::success(&format!("Updated credential '{}'", m.name));
    if rotated {
        output::info("Secret rotated.");
    }

    Ok(())
}
