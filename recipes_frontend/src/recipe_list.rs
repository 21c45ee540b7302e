use log::{debug, warn};
use recipes_model::{Recipe, RecipeBatch, RecipeId};

use crate::api::Error;

/// Identity of a rendered recipe. Records without an id fall back to their
/// position, which only holds until the list is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipeKey {
    Id(RecipeId),
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderUnit {
    pub key: RecipeKey,
    pub recipe: Recipe,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Pending,
    Loaded {
        rejected: usize,
    },
    Failed {
        message: String,
    },
}

/// Display state of the recipe list.
///
/// The list only ever changes by wholesale replacement. A failed load keeps
/// whatever was shown before.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeListState {
    recipes: Vec<Recipe>,
    status: LoadStatus,
}

impl RecipeListState {
    pub fn initialize() -> Self {
        RecipeListState::default()
    }

    pub fn is_pending(&self) -> bool {
        self.status == LoadStatus::Pending
    }

    pub fn on_data_loaded(&mut self, batch: RecipeBatch) {
        let RecipeBatch { recipes, rejected } = batch;
        debug!(
            "Loaded {} recipes ({} rejected)",
            recipes.len(),
            rejected.len()
        );
        self.recipes = recipes;
        self.status = LoadStatus::Loaded {
            rejected: rejected.len(),
        };
    }

    pub fn on_load_failed(&mut self, err: &Error) {
        warn!("Failed to load recipes: {err}");
        self.status = LoadStatus::Failed {
            message: format!("{err}"),
        };
    }

    pub fn apply(&mut self, outcome: Result<RecipeBatch, Error>) {
        match outcome {
            Ok(batch) => self.on_data_loaded(batch),
            Err(err) => self.on_load_failed(&err),
        }
    }

    pub fn render(&self) -> Vec<RenderUnit> {
        self.recipes
            .iter()
            .enumerate()
            .map(|(position, recipe)| RenderUnit {
                key: recipe
                    .id()
                    .cloned()
                    .map(RecipeKey::Id)
                    .unwrap_or(RecipeKey::Position(position)),
                recipe: recipe.clone(),
            })
            .collect()
    }

    pub fn banner(&self) -> Option<String> {
        match &self.status {
            LoadStatus::Failed { message } => Some(format!("Could not load recipes. {message}")),
            _ => None,
        }
    }
}
