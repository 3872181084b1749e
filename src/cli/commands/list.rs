//! `credvault list` — display credentials in a table, secrets masked.

use crate::cli::output;
use crate::cli::{open_vault, print_json, Cli};
use crate::errors::Result;
use crate::vault::{ListFilter, Provider};

/// Filter and paging arguments for the `list` command.
#[derive(Debug, Default)]
pub struct ListArgs<'a> {
    pub provider: Option<Provider>,
    pub environment: Option<&'a str>,
    pub active: Option<bool>,
    pub search: Option<&'a str>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListArgs<'_> {
    fn filter(&self) -> ListFilter {
        let mut filter = ListFilter::default();
        if let Some(p) = self.provider {
            filter = filter.provider(p);
        }
        if let Some(env) = self.environment {
            filter = filter.environment(env);
        }
        if let Some(active) = self.active {
            filter = filter.active(active);
        }
        if let Some(s) = self.search {
            filter = filter.search(s);
        }
        filter
    }
}

/// Execute the `list` command.
pub fn execute(cli: &Cli, args: &ListArgs<'_>) -> Result<()> {
    let vault = open_vault(cli)?;
    let page = vault.list(&args.filter(), args.page, args.limit)?;

    if cli.json {
        return print_json(&page);
    }

    output::print_credentials_table(&page);

    Ok(())
}
