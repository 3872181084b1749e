use clap::Parser;
use credvault::cli::commands::{
    audit_cmd, consume, create, delete, get, list, providers, stats, toggle, update,
};
use credvault::cli::{Cli, Commands};
use credvault::vault::CredentialPatch;
use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so stdout stays clean for secrets and JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CREDVAULT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("credvault=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create {
            ref name,
            provider,
            ref environment,
            ref description,
            inactive,
            ref secret,
        } => create::execute(
            &cli,
            create::CreateArgs {
                name,
                provider,
                environment: environment.as_deref(),
                description: description.as_deref(),
                inactive,
                secret: secret.as_deref(),
            },
        ),
        Commands::List {
            provider,
            ref environment,
            active,
            ref search,
            page,
            limit,
        } => list::execute(
            &cli,
            &list::ListArgs {
                provider,
                environment: environment.as_deref(),
                active,
                search: search.as_deref(),
                page,
                limit,
            },
        ),
        Commands::Stats => stats::execute(&cli),
        Commands::Get { ref id, reveal } => get::execute(&cli, id, reveal),
        Commands::Update {
            ref id,
            ref name,
            provider,
            ref environment,
            ref description,
            ref secret,
            active,
        } => update::execute(
            &cli,
            id,
            CredentialPatch {
                name: name.clone(),
                provider,
                environment: environment.clone(),
                description: description.clone(),
                secret: secret.clone(),
                is_active: active,
            },
        ),
        Commands::Toggle { ref id } => toggle::execute(&cli, id),
        Commands::Delete { ref id, force } => delete::execute(&cli, id, force),
        Commands::Consume {
            provider,
            ref environment,
        } => match consume::execute(&cli, provider, environment.as_deref()) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(consume::NO_ACTIVE_CREDENTIAL),
            Err(e) => Err(e),
        },
        Commands::Audit { last, ref since } => audit_cmd::execute(&cli, last, since.as_deref()),
        Commands::Providers => providers::execute(&cli),
    };

    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        if !e.is_client_facing() {
            tracing::debug!(error = ?e, "command failed");
        }
        std::process::exit(e.exit_code());
    }
}
