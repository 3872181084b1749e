//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{CredentialMetadata, MaskedCredential, Page, Stats};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

fn format_time(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map_or_else(
        || "never".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

fn active_label(is_active: bool) -> String {
    if is_active {
        style("active").green().to_string()
    } else {
        style("inactive").dim().to_string()
    }
}

/// Print one page of masked credentials plus the pagination footer.
pub fn print_credentials_table(page: &Page<MaskedCredential>) {
    if page.items.is_empty() {
        info("No credentials match.");
        if page.total == 0 {
            tip("Run `credvault create --name <NAME> --provider <PROVIDER>` to add one.");
        }
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "ID",
        "Name",
        "Provider",
        "Environment",
        "Status",
        "Secret",
        "Uses",
        "Last used",
    ]);

    for c in &page.items {
        let m = &c.metadata;
        table.add_row(vec![
            m.id.clone(),
            m.name.clone(),
            m.provider.to_string(),
            m.environment.clone(),
            active_label(m.is_active),
            c.secret.to_string(),
            m.usage_count.to_string(),
            format_time(m.last_used_at),
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        style(format!(
            "page {} of {} — {} credential(s), {} per page",
            page.page,
            page.pages.max(1),
            page.total,
            page.limit
        ))
        .dim()
    );
}

/// Print a single credential as a two-column table.
pub fn print_credential(metadata: &CredentialMetadata, secret: &str) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let rows: Vec<(&str, String)> = vec![
        ("ID", metadata.id.clone()),
        ("Name", metadata.name.clone()),
        ("Provider", metadata.provider.to_string()),
        ("Environment", metadata.environment.clone()),
        ("Status", active_label(metadata.is_active)),
        ("Secret", secret.to_string()),
        (
            "Description",
            metadata.description.clone().unwrap_or_default(),
        ),
        ("Uses", metadata.usage_count.to_string()),
        ("Last used", format_time(metadata.last_used_at)),
        (
            "Created by",
            metadata.created_by.clone().unwrap_or_default(),
        ),
        ("Created", format_time(Some(metadata.created_at))),
        ("Updated", format_time(Some(metadata.updated_at))),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }

    println!("{table}");
}

/// Print the stats summary and per-provider breakdown.
pub fn print_stats(stats: &Stats, recent_days: u32) {
    info(&format!(
        "{} credential(s), {} active, {} used in the last {recent_days} days",
        stats.total, stats.active, stats.recently_used
    ));

    if stats.by_provider.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Provider", "Credentials"]);
    for (provider, count) in &stats.by_provider {
        table.add_row(vec![provider.to_string(), count.to_string()]);
    }
    println!("{table}");
}
