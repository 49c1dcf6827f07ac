//! Bulk-load ingredients and tags from JSON files.
//!
//! ```sh
//! load-ingredients --ingredients data/ingredients.json --tags data/tags.json
//! ```
//!
//! Ingredient files hold `[{"name": "flour", "measurement_unit": "g"}]`;
//! tag files hold `[{"name": "Breakfast", "color": "#E26C2D", "slug": "breakfast"}]`.
//! Every row is validated before anything is written, and rows that
//! already exist are skipped.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Deserialize;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use recipebook::domain::{NewIngredient, NewTag};
use recipebook::domain::ports::{CatalogueImport, CatalogueImportRepository};
use recipebook::outbound::persistence::{
    DbPool, DieselCatalogueImportRepository, PoolConfig, run_pending_migrations,
};

/// `load-ingredients` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-ingredients",
    about = "Import ingredients and tags into the recipe database",
    version
)]
struct CliArgs {
    /// JSON array of ingredients.
    #[arg(long = "ingredients", value_name = "path")]
    ingredients: PathBuf,
    /// Optional JSON array of tags.
    #[arg(long = "tags", value_name = "path")]
    tags: Option<PathBuf>,
    /// Database connection URL. Falls back to `RECIPEBOOK_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IngredientRecord {
    name: String,
    measurement_unit: String,
}

#[derive(Debug, Deserialize)]
struct TagRecord {
    name: String,
    color: String,
    slug: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init()
    {
        return Err(eyre!("tracing init failed: {error}"));
    }

    let args = CliArgs::parse();
    let batch = read_batch(&args)?;
    let database_url = resolve_database_url(args.database_url)?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(import(database_url, batch))
}

async fn import(database_url: String, batch: CatalogueImport) -> Result<()> {
    run_pending_migrations(&database_url)
        .await
        .wrap_err("failed to apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to create database pool")?;
    let summary = DieselCatalogueImportRepository::new(pool)
        .import(&batch)
        .await
        .wrap_err("import failed; nothing was written")?;

    info!(
        ingredients_inserted = summary.ingredients_inserted,
        ingredients_skipped = summary.ingredients_skipped,
        tags_inserted = summary.tags_inserted,
        tags_skipped = summary.tags_skipped,
        "catalogue import finished"
    );
    Ok(())
}

fn read_batch(args: &CliArgs) -> Result<CatalogueImport> {
    let ingredients = parse_ingredients(&read_file(&args.ingredients)?)
        .wrap_err_with(|| format!("invalid ingredient file {}", args.ingredients.display()))?;
    let tags = match &args.tags {
        Some(path) => parse_tags(&read_file(path)?)
            .wrap_err_with(|| format!("invalid tag file {}", path.display()))?,
        None => Vec::new(),
    };
    Ok(CatalogueImport { ingredients, tags })
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).wrap_err_with(|| format!("failed to read {}", path.display()))
}

fn parse_ingredients(raw: &[u8]) -> Result<Vec<NewIngredient>> {
    let records: Vec<IngredientRecord> =
        serde_json::from_slice(raw).wrap_err("expected a JSON array of ingredients")?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            NewIngredient::try_new(record.name, record.measurement_unit)
                .wrap_err_with(|| format!("ingredient #{index}"))
        })
        .collect()
}

fn parse_tags(raw: &[u8]) -> Result<Vec<NewTag>> {
    let records: Vec<TagRecord> =
        serde_json::from_slice(raw).wrap_err("expected a JSON array of tags")?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            NewTag::try_new(record.name, record.color, record.slug)
                .wrap_err_with(|| format!("tag #{index}"))
        })
        .collect()
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    let url = match explicit {
        Some(value) => value,
        None => env::var("RECIPEBOOK_DATABASE_URL").map_err(|_| {
            eyre!("database URL missing: set --database-url or RECIPEBOOK_DATABASE_URL")
        })?,
    };
    if url.trim().is_empty() {
        return Err(eyre!("database URL must not be empty"));
    }
    Ok(url)
}
