pub mod app_config;
pub mod recipe_service;
pub mod recipe_store;
