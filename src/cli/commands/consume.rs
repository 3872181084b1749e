//! `credvault consume` — print the active secret for a provider.
//!
//! This is the integration path: each successful call counts as one use
//! of the credential.  The secret goes to stdout on its own line so it
//! can be captured by a script.

use crate::audit::{log_audit, AuditEvent};
use crate::cli::{open_vault, output, settings, Cli};
use crate::errors::Result;
use crate::vault::Provider;

/// Exit code when no active credential exists for the pair.
pub const NO_ACTIVE_CREDENTIAL: i32 = 2;

/// Execute the `consume` command.
///
/// Returns `Ok(false)` when there is no active credential, so the caller
/// can exit with [`NO_ACTIVE_CREDENTIAL`].
pub fn execute(cli: &Cli, provider: Provider, environment: Option<&str>) -> Result<bool> {
    let vault = open_vault(cli)?;
    let environment = match environment {
        Some(env) => env.trim().to_string(),
        None => settings()?.default_environment,
    };

    match vault.consume(provider, &environment)? {
        Some(secret) => {
            log_audit(
                cli,
                AuditEvent::new("consume").pair(provider.as_str(), &environment),
            );
            println!("{}", secret.as_str());
            Ok(true)
        }
        None => {
            output::warning(&format!(
                "No active credential for {provider} in '{environment}'"
            ));
            Ok(false)
        }
    }
}
