use leptos::*;
use recipes_model::Recipe;
use std::rc::Rc;

use crate::api::RecipeService;
use crate::recipe_list::{RecipeListState, RenderUnit};

/// Shows every recipe the service returns. Fetches once, on creation.
#[component]
pub fn RecipeListView(service: Rc<dyn RecipeService>) -> impl IntoView {
    let (state, set_state) = create_signal(RecipeListState::initialize());

    spawn_local(async move {
        let outcome = service.list_recipes().await;
        if set_state.try_update(|state| state.apply(outcome)).is_none() {
            log::debug!("Recipe list went away before the recipes arrived");
        }
    });

    let banner = move || {
        state
            .with(RecipeListState::banner)
            .map(|message| view! { <ErrorBanner message /> })
    };
    let pending = move || {
        state
            .with(RecipeListState::is_pending)
            .then(|| view! { <Pending /> })
    };

    view! {
        {banner}
        {pending}
        <div class = "grid md:grid-cols-2 gap-4 lg:grid-cols-3 sm:grid-cols-1">
            <For
                each = move || state.with(RecipeListState::render)
                key = |unit: &RenderUnit| unit.key.clone()
                children = move |RenderUnit { recipe, .. }: RenderUnit| {
                    view! { <RecipeItemView recipe /> }
                }
            />
        </div>
    }
}

#[component]
pub fn RecipeItemView(recipe: Recipe) -> impl IntoView {
    let name = recipe.name().to_string();
    let tags = recipe.tags().to_vec();
    let ingredients = recipe.ingredients().to_vec();
    let instructions = recipe.instructions().to_vec();
    let published = recipe
        .published_at()
        .map(|at| view! { <p class = "text-sm text-gray-500">{format!("Published {}", at.date())}</p> });

    let tags = (!tags.is_empty()).then(|| {
        view! {
            <div class = "flex flex-wrap gap-1">
                {tags.into_iter().map(|tag| view! { <span class = "badge badge-outline">{tag}</span> }).collect_view()}
            </div>
        }
    });
    let ingredients = (!ingredients.is_empty()).then(|| {
        view! {
            <p class = "text-xl text-gray-600">"Ingredients"</p>
            <ul class = "list-disc pl-5">
                {ingredients.into_iter().map(|ingredient| view! { <li>{ingredient}</li> }).collect_view()}
            </ul>
        }
    });
    let instructions = (!instructions.is_empty()).then(|| {
        view! {
            <p class = "text-xl text-gray-600">"Directions"</p>
            <ol class = "list-decimal pl-5">
                {instructions.into_iter().map(|step| view! { <li>{step}</li> }).collect_view()}
            </ol>
        }
    });

    view! {
        <div class = "card bg-base-100 shadow-md shadow-base-300">
            <div class = "card-body">
                <h2 class = "card-title">{name}</h2>
                {published}
                {tags}
                {ingredients}
                {instructions}
            </div>
        </div>
    }
}

#[component]
fn ErrorBanner(message: String) -> impl IntoView {
    view! {
        <div class = "alert alert-error mb-3">{message}</div>
    }
}

#[component]
fn Pending() -> impl IntoView {
    view! {
        <div class = "loading loading-infinity loading-secondary" />
    }
}
