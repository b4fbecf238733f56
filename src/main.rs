//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `mirror_bouncer` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Opening and migrating the catalog database
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use mirror_bouncer::app::{run_periodic, shutdown_gracefully, shutdown_on_ctrl_c};
use mirror_bouncer::config::{Cli, Command, SentryArgs, ServeArgs, SetRatingArgs};
use mirror_bouncer::initialization::init_logger_with;
use mirror_bouncer::server::start_server;
use mirror_bouncer::storage::init_db_pool_with_path;
use mirror_bouncer::{run_migrations, CatalogStore, Resolver, Sentry, SqliteCatalog};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli).await {
        eprintln!("mirror_bouncer error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let pool = init_db_pool_with_path(&cli.db_path)
        .await
        .with_context(|| format!("Failed to open database {}", cli.db_path.display()))?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalog::new(pool));

    match cli.command {
        Command::Serve(args) => serve(store, args).await,
        Command::Sentry(args) => sentry(store, args).await,
        Command::SetRating(args) => set_rating(store, args).await,
    }
}

async fn serve(store: Arc<dyn CatalogStore>, args: ServeArgs) -> Result<()> {
    let resolver = Arc::new(Resolver::new(store, args.resolver_config()));
    let shutdown = shutdown_on_ctrl_c();
    start_server(args.server_config(), resolver, shutdown)
        .await
        .context("Front end stopped")
}

async fn sentry(store: Arc<dyn CatalogStore>, args: SentryArgs) -> Result<()> {
    let sentry = Arc::new(
        Sentry::new(store, &args.probe_config()).context("Failed to initialize sentry")?,
    );
    let params = args.sweep_params();

    let Some(period) = args.interval() else {
        let report = sentry.run(&params).await.context("Sentry run failed")?;
        println!(
            "Checked {} mirror{} ({} down) and {} location{} ({} healthy, {} pruned) in {:.1}s",
            report.mirrors_checked,
            if report.mirrors_checked == 1 { "" } else { "s" },
            report.mirrors_unhealthy,
            report.locations_checked,
            if report.locations_checked == 1 { "" } else { "s" },
            report.locations_healthy,
            report.locations_pruned,
            report.elapsed.as_secs_f64()
        );
        return Ok(());
    };

    let cancel = shutdown_on_ctrl_c();
    let scheduler = tokio::spawn(run_periodic(sentry, params, period, cancel.child_token()));
    cancel.cancelled().await;
    let completed = shutdown_gracefully(cancel, scheduler).await.unwrap_or_default();
    println!("Completed {} sweep(s)", completed);
    Ok(())
}

async fn set_rating(store: Arc<dyn CatalogStore>, args: SetRatingArgs) -> Result<()> {
    store
        .set_mirror_rating(args.mirror, args.rating)
        .await
        .with_context(|| format!("Failed to set rating of mirror {}", args.mirror))?;
    println!("Mirror {} rating set to {}", args.mirror, args.rating);
    Ok(())
}
