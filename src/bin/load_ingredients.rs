// ABOUTME: Imports the ingredient catalog from a JSON file
// ABOUTME: Inserts {name, measurement_unit} entries, skipping ones already present
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

//! # Ingredient Loader
//!
//! ```bash
//! load-ingredients data/ingredients.json
//! load-ingredients --database-url sqlite:./data/cookbook.db data/ingredients.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cookbook_server::{
    config::environment::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    models::NewIngredient,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "load-ingredients")]
#[command(about = "Load ingredients from a JSON array of {name, measurement_unit}")]
pub struct Args {
    /// Path to the JSON file
    path: PathBuf,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let database_url = match args.database_url {
        Some(url) => DatabaseUrl::parse_url(&url)?,
        None => ServerConfig::from_env()?.database_url,
    };

    let raw = tokio::fs::read_to_string(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let ingredients: Vec<NewIngredient> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of ingredients", args.path.display()))?;

    let database = Database::new(&database_url).await?;
    database.migrate().await?;

    let added = database
        .ingredients()
        .insert_ignoring_conflicts(&ingredients)
        .await?;
    info!(
        added,
        total = ingredients.len(),
        "Imported ingredients from {}",
        args.path.display()
    );
    println!("Loaded {added} of {} ingredients", ingredients.len());

    Ok(())
}
