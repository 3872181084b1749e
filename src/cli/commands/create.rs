//! `credvault create` — store a new credential.

use crate::audit::{log_audit, AuditEvent};
use crate::cli::output;
use crate::cli::{open_vault, print_json, read_secret, Cli};
use crate::errors::Result;
use crate::vault::{NewCredential, Provider};

/// Arguments for the `create` command.
pub struct CreateArgs<'a> {
    pub name: &'a str,
    pub provider: Provider,
    pub environment: Option<&'a str>,
    pub description: Option<&'a str>,
    pub inactive: bool,
    pub secret: Option<&'a str>,
}

/// Execute the `create` command.
pub fn execute(cli: &Cli, args: CreateArgs<'_>) -> Result<()> {
    // Open first so a missing key fails before we prompt for anything.
    let vault = open_vault(cli)?;

    let secret = read_secret(args.secret, &format!("Secret for {}", args.provider))?;

    let mut request = NewCredential::new(args.name, args.provider, secret.as_str());
    if let Some(env) = args.environment {
        request = request.environment(env);
    }
    if let Some(desc) = args.description {
        request = request.description(desc);
    }
    if args.inactive {
        request = request.active(false);
    }
    if let Some(actor) = cli.actor.as_deref() {
        request = request.created_by(actor);
    }

    let created = vault.create(request)?;
    let m = &created.metadata;

    log_audit(
        cli,
        AuditEvent::new("create")
            .credential(&m.id)
            .pair(m.provider.as_str(), &m.environment),
    );

    if cli.json {
        return print_json(&created);
    }

    output::success(&format!(
        "Created {} credential '{}' for {} ({})",
        if m.is_active { "active" } else { "inactive" },
        m.name,
        m.provider,
        m.environment
    ));
    output::tip(&format!("id: {}", m.id));

    Ok(())
}
