pub mod api;
pub mod components;
pub mod recipe_list;
