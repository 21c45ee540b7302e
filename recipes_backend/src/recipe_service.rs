use axum::{
    extract::{Extension, Query},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use recipes_model::{serde_json, Recipe};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::recipe_store::RecipeStore;

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("Missing `tag` query parameter")]
    MissingTag,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingTag => StatusCode::BAD_REQUEST,
        };
        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct TagQuery {
    tag: Option<String>,
}

pub fn recipe_routes(store: Arc<RecipeStore>) -> Router {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/search", get(search_recipes))
        .layer(Extension(store))
}

/// Recipe routes plus the layers the server runs them behind. The viewer is
/// served from a different origin, so reads are open to any origin.
pub fn app(store: Arc<RecipeStore>) -> Router {
    recipe_routes(store)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        )
        .layer(TraceLayer::new_for_http())
}

pub(crate) async fn list_recipes(
    Extension(store): Extension<Arc<RecipeStore>>,
) -> Json<Vec<Recipe>> {
    Json(store.list().to_vec())
}

pub(crate) async fn search_recipes(
    Extension(store): Extension<Arc<RecipeStore>>,
    Query(query): Query<TagQuery>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let tag = query
        .tag
        .filter(|tag| !tag.is_empty())
        .ok_or(ApiError::MissingTag)?;
    let found = store.search_by_tag(&tag);
    debug!("search for tag {tag} found {} recipes", found.len());
    Ok(Json(found))
}
