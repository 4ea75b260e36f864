use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::{CategoryImportUseCase, ProductImportUseCase};
use crate::domain::error::Result;
use crate::domain::import_summary::ImportSummary;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::store::snapshot::CatalogSnapshot;
use crate::interfaces::cli::{Cli, Commands};

/// `RUST_LOG` wins over the verbosity flags' default level
fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point of the binary; returns the process exit code
pub fn run() -> i32 {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli);

    match execute(&cli) {
        Ok(summary) => {
            println!("{}", summary);
            0
        }
        Err(e) => {
            tracing::error!("{}", e);
            e.exit_code()
        }
    }
}

fn execute(cli: &Cli) -> Result<ImportSummary> {
    let mut config = ConfigService::new(cli.config.as_deref()).load()?;
    cli.apply_overrides(&mut config);
    tracing::debug!(?config, "configuration loaded");

    let snapshot = CatalogSnapshot::load(&config.store_path)?;
    let (mut store, mut linker) = snapshot.into_parts();

    let summary = match &cli.command {
        Commands::Categories { csv } => {
            let csv = csv
                .clone()
                .unwrap_or_else(|| config.default_category_csv.clone());
            CategoryImportUseCase::new(config.clone()).execute(
                &mut store,
                linker.as_dyn_mut(),
                &csv,
            )?
        }
        Commands::Products { csv } => ProductImportUseCase::new(config.clone()).execute(
            &mut store,
            linker.as_dyn_mut(),
            csv,
        )?,
    };

    if config.dry_run {
        tracing::info!("Dry run: {} left untouched", config.store_path.display());
    } else {
        CatalogSnapshot::from_parts(store, linker).save(&config.store_path)?;
        tracing::info!("Saved {}", config.store_path.display());
    }
    Ok(summary)
}
