//! Root-to-tenant migration CLI.
//!
//! Exit codes: 0 success (or declined), 1 finished with document errors or a
//! runtime failure, 2 configuration error (e.g. missing tenant ID).

use anyhow::{Context, anyhow};
use clap::Parser;
use staffhub_core::{StaffHubConfig, TenantId};
use staffhub_platform::migration::{self, MigrationOptions, Migrator};
use staffhub_platform::create_store;
use std::path::PathBuf;
use std::process::ExitCode;

mod logging;

const EXIT_RUN_ERRORS: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "staffhub-migrate")]
#[command(author, version, about = "Copy flat root collections into a tenant namespace", long_about = None)]
struct Cli {
    /// Target tenant ID
    #[arg(long, env = "TENANT_ID")]
    tenant_id: Option<String>,

    /// Report what would be migrated without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Documents per batched write (1-500)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Comma-separated source collections (default: from config)
    #[arg(long, value_delimiter = ',')]
    collections: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(long)]
    force: bool,

    /// Config file (default: ~/.staffhub/config.toml)
    #[arg(long, env = "STAFFHUB_CONFIG")]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_options(cli: &Cli, config: &StaffHubConfig) -> anyhow::Result<MigrationOptions> {
    let raw = cli
        .tenant_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("missing --tenant-id (or TENANT_ID)"))?;
    let tenant_id = TenantId::parse(raw)?;

    let collections: Vec<String> = if cli.collections.is_empty() {
        config.migration.collections.clone()
    } else {
        cli.collections
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    };

    let options = MigrationOptions {
        tenant_id,
        dry_run: cli.dry_run,
        batch_size: cli.batch_size.unwrap_or(config.migration.batch_size),
        collections,
        force: cli.force,
    };
    options.validate()?;
    Ok(options)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let prepared = StaffHubConfig::load(cli.config.as_deref())
        .context("loading config")
        .and_then(|config| Ok((build_options(&cli, &config)?, config)))
        .and_then(|(options, config)| {
            let store = create_store(&config.backend).context("opening backend")?;
            Ok(Migrator::new(store, options)?)
        });
    let migrator = match prepared {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match run(&cli, &migrator).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_RUN_ERRORS)
        }
    }
}

async fn run(cli: &Cli, migrator: &Migrator) -> anyhow::Result<ExitCode> {
    eprintln!("{}", migrator.describe());
    if migrator.options().dry_run {
        eprintln!("Dry run: nothing will be written.");
    }

    if migrator.options().needs_confirmation() {
        let stdin = std::io::stdin();
        let proceed = migration::confirm(stdin.lock(), std::io::stderr(), "This writes to the live backend.")?;
        if !proceed {
            eprintln!("Aborted.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let summary = migrator.run().await;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.render());
    }

    if summary.has_errors() {
        Ok(ExitCode::from(EXIT_RUN_ERRORS))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
