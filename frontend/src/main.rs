use std::rc::Rc;

use leptos::*;
use log::{info, warn};
use recipes_frontend::api::{HttpRecipeService, RecipeService, ServiceConfig};
use recipes_frontend::components::RecipeListView;

fn service_config() -> ServiceConfig {
    match option_env!("RECIPES_API_URL") {
        Some(url) => ServiceConfig::new(url).unwrap_or_else(|err| {
            warn!("Ignoring RECIPES_API_URL={url}: {err}");
            ServiceConfig::default()
        }),
        None => ServiceConfig::default(),
    }
}

fn main() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    let config = service_config();
    info!("Reading recipes from {}", config.base_url);
    let service: Rc<dyn RecipeService> = Rc::new(HttpRecipeService::new(config));
    mount_to_body(move || {
        view! {
            <App service />
        }
    })
}

#[component]
fn App(service: Rc<dyn RecipeService>) -> impl IntoView {
    view! {
        <div class = "bg-base-100 w-full h-screen overflow-auto">
            <TopBar />
            <div class = "ml-5 mr-5 mt-3">
                <RecipeListView service />
            </div>
        </div>
    }
}

#[component]
fn TopBar() -> impl IntoView {
    view! {
        <div class="h-24 flex border border-b-1 border-base-content shadow-md shadow-base-300">
            <div class="h-24 flex-1 pt-5 pl-5">
                <span class="prose"><h1>Recipes</h1></span>
            </div>
        </div>
    }
}
