use async_trait::async_trait;
use gloo_net::http;
use log::warn;
use recipes_model::{parse_recipes, ParseError, RecipeBatch, RejectedRecipe};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to do some HTTP: {0}")]
    Request(#[from] gloo_net::Error),
    #[error("Failed to read recipes: {0}")]
    Parse(#[from] ParseError),
    #[error("Bad response: {0}")]
    Http(String),
    #[error("Invalid service url: {0}")]
    Url(#[from] url::ParseError),
}

/// Where the recipe service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: Url,
}

impl ServiceConfig {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        // `join` drops the last path segment unless the base ends in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(ServiceConfig { base_url })
    }

    pub fn recipes_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join("recipes")?)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig::new(DEFAULT_BASE_URL).expect("default service url must parse")
    }
}

#[async_trait(?Send)]
pub trait RecipeService {
    async fn list_recipes(&self) -> Result<RecipeBatch, Error>;
}

pub struct HttpRecipeService {
    config: ServiceConfig,
}

impl HttpRecipeService {
    pub fn new(config: ServiceConfig) -> Self {
        HttpRecipeService { config }
    }
}

async fn response_text(resp: http::Response) -> Result<String, Error> {
    if !resp.ok() {
        let status = resp.status_text();
        let code = resp.status();
        let text = resp.text().await?;
        Err(Error::Http(format!("{status} {code} – {text}")))
    } else {
        Ok(resp.text().await?)
    }
}

pub fn report_rejected(batch: &RecipeBatch) {
    for RejectedRecipe { index, reason } in &batch.rejected {
        warn!("Skipping recipe at position {index}: {reason}");
    }
}

#[async_trait(?Send)]
impl RecipeService for HttpRecipeService {
    async fn list_recipes(&self) -> Result<RecipeBatch, Error> {
        let url = self.config.recipes_url()?;
        let resp = http::Request::get(url.as_str()).send().await?;
        let body = response_text(resp).await?;
        let batch = parse_recipes(&body)?;
        report_rejected(&batch);
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let url = ServiceConfig::default().recipes_url().unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/recipes");
    }

    #[test]
    fn base_path_is_kept() {
        let config = ServiceConfig::new("https://food.example.com/api/v1").unwrap();
        assert_eq!(
            config.recipes_url().unwrap().as_str(),
            "https://food.example.com/api/v1/recipes"
        );
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(matches!(
            ServiceConfig::new("not a url"),
            Err(Error::Url(_))
        ));
    }
}
