//! `credvault audit` — display the audit log.
//!
//! Usage:
//!   credvault audit               # show last 50 entries
//!   credvault audit --last 20     # show last 20
//!   credvault audit --since 7d    # entries from last 7 days

use chrono::{TimeDelta, Utc};

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::{audit_path, output, print_json, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let path = audit_path()?;
    if !path.exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&path)
        .ok_or_else(|| VaultError::AuditError("failed to open audit database".into()))?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit.query(last, since_dt)?;

    if cli.json {
        let rows: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "id": e.id,
                    "timestamp": e.timestamp.to_rfc3339(),
                    "operation": e.operation,
                    "credentialId": e.credential_id,
                    "provider": e.provider,
                    "environment": e.environment,
                    "actor": e.actor,
                    "details": e.details,
                })
            })
            .collect();
        return print_json(&rows);
    }

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, duration_of): (&str, fn(i64) -> Option<TimeDelta>) =
        if let Some(s) = input.strip_suffix('d') {
            (s, TimeDelta::try_days)
        } else if let Some(s) = input.strip_suffix('h') {
            (s, TimeDelta::try_hours)
        } else if let Some(s) = input.strip_suffix('m') {
            (s, TimeDelta::try_minutes)
        } else {
            return Err(VaultError::CommandFailed(format!(
                "invalid duration '{input}' — use format like 7d, 24h, or 30m"
            )));
        };

    let num: i64 = num_str.parse().map_err(|_| {
        VaultError::CommandFailed(format!(
            "invalid duration '{input}' — number part is not valid"
        ))
    })?;

    duration_of(num)
        .and_then(|d| Utc::now().checked_sub_signed(d))
        .ok_or_else(|| {
            VaultError::CommandFailed(format!("invalid duration '{input}' — out of range"))
        })
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Time",
        "Operation",
        "Credential",
        "Provider",
        "Environment",
        "Actor",
        "Details",
    ]);

    let dash = |v: &Option<String>| v.as_deref().unwrap_or("-").to_string();

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            dash(&entry.credential_id),
            dash(&entry.provider),
            dash(&entry.environment),
            dash(&entry.actor),
            dash(&entry.details),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "create" => style(op).green().to_string(),
        "update" | "toggle" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "reveal" => style(op).yellow().to_string(),
        "consume" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
