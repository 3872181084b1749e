//! `credvault get` — show one credential, optionally with its secret.

use crate::audit::{log_audit, AuditEvent};
use crate::cli::output;
use crate::cli::{open_vault, print_json, Cli};
use crate::errors::Result;
use crate::vault::{CredentialView, MASKED_SENTINEL};

/// Execute the `get` command.
pub fn execute(cli: &Cli, id: &str, reveal: bool) -> Result<()> {
    let vault = open_vault(cli)?;
    let view = vault.get_one(id, reveal)?;

    // Revealing plaintext is recorded; a masked read is not.
    if matches!(view, CredentialView::Revealed(_)) {
        let m = view.metadata();
        log_audit(
            cli,
            AuditEvent::new("reveal")
                .credential(&m.id)
                .pair(m.provider.as_str(), &m.environment),
        );
    }

    if cli.json {
        return print_json(&view);
    }

    match view {
        CredentialView::Masked(ref c) => output::print_credential(&c.metadata, MASKED_SENTINEL),
        CredentialView::Revealed(ref r) => output::print_credential(&r.metadata, r.secret()),
    }

    Ok(())
}
