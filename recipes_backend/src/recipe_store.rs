use recipes_model::{parse_recipes, ParseError, Recipe, RecipeId, RejectedRecipe};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::{info, warn};

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Failed to read recipes from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse recipes: {0}")]
    Parse(#[from] ParseError),
}
type Result<T> = std::result::Result<T, Error>;

/// Read-only set of recipes, loaded once at startup.
#[derive(Debug, Default)]
pub struct RecipeStore {
    recipes: Vec<Recipe>,
}

impl RecipeStore {
    pub async fn load(path: &Path) -> Result<Self> {
        let body = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let store = Self::from_json(&body)?;
        info!("loaded {} recipes from {}", store.recipes.len(), path.display());
        Ok(store)
    }

    pub fn from_json(body: &str) -> Result<Self> {
        let batch = parse_recipes(body)?;
        for RejectedRecipe { index, reason } in &batch.rejected {
            warn!("skipping seed recipe {index}: {reason}");
        }
        Ok(Self::new(batch.recipes))
    }

    /// Recipes without an id get a fresh 24 hex digit one.
    pub fn new(mut recipes: Vec<Recipe>) -> Self {
        let mut taken = recipes
            .iter()
            .filter_map(|recipe| recipe.id().cloned())
            .collect::<HashSet<_>>();
        let mut counter: u64 = 0;
        for recipe in recipes.iter_mut().filter(|recipe| recipe.id().is_none()) {
            let id = loop {
                counter += 1;
                let candidate = RecipeId(format!("{counter:024x}"));
                if !taken.contains(&candidate) {
                    break candidate;
                }
            };
            taken.insert(id.clone());
            recipe.set_id(id);
        }
        RecipeStore { recipes }
    }

    pub fn list(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn search_by_tag(&self, tag: &str) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| recipe.has_tag(tag))
            .cloned()
            .collect()
    }
}
