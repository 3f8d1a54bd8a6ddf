use std::path::Path;

use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{Entity, Food, Recipe, User},
    services::Catalog,
};

/// Initial foods, recipes and users, in the same JSON shape the API accepts
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub foods: Vec<Food>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// How many entities a seed run wrote and how many it left alone
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Reads a seed file and writes every entity that is not stored yet
pub async fn load_seed_file(catalog: &Catalog, path: impl AsRef<Path>) -> anyhow::Result<SeedSummary> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await?;
    let data: SeedData = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Invalid seed file {}: {}", path.display(), e))?;

    let summary = apply_seed(catalog, data).await?;
    tracing::info!(
        path = %path.display(),
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Seed data applied"
    );
    Ok(summary)
}

/// Writes seed entities, never overwriting what the store already holds
pub async fn apply_seed(catalog: &Catalog, data: SeedData) -> AppResult<SeedSummary> {
    let mut summary = SeedSummary::default();
    insert_all(catalog, &data.foods, &mut summary).await?;
    insert_all(catalog, &data.recipes, &mut summary).await?;
    insert_all(catalog, &data.users, &mut summary).await?;
    Ok(summary)
}

async fn insert_all<E: Entity>(
    catalog: &Catalog,
    entities: &[E],
    summary: &mut SeedSummary,
) -> AppResult<()> {
    let collection = E::COLLECTION;
    for entity in entities {
        if catalog.insert(entity).await? {
            summary.inserted += 1;
        } else {
            tracing::debug!(%collection, id = entity.id(), "Seed entity already stored");
            summary.skipped += 1;
        }
    }
    Ok(())
}
