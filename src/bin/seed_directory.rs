//! Seeds the demo directory (bases, farmers, links and seasonal products).
//!
//! Applies pending migrations first so it can run against an empty database.

use anyhow::Context;
use clap::Parser;
use csa_loop::{
    config::ConfigLoader,
    db::init_pool,
    migration::{Migrator, MigratorTrait},
    seeds::{SeedOutcome, seed_directory},
    telemetry::init_tracing,
};

#[derive(Debug, Parser)]
#[command(
    name = "seed-directory",
    about = "Insert the demo CSA LOOP directory into the configured database"
)]
struct Args {
    /// Overrides CSA_LOOP_DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,

    /// Skip running migrations before seeding
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    init_tracing(&config).context("failed to initialize telemetry")?;

    let db = init_pool(&config).await?;
    if !args.skip_migrations {
        Migrator::up(&db, None)
            .await
            .context("failed to apply migrations")?;
    }

    match seed_directory(&db).await? {
        SeedOutcome::Seeded {
            bases,
            farmers,
            seasonal_products,
        } => println!(
            "Seeded {bases} bases, {farmers} farmers and {seasonal_products} seasonal product rows"
        ),
        SeedOutcome::AlreadySeeded => println!("Directory already seeded; nothing to do"),
    }

    Ok(())
}
