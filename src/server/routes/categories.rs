use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, routing::get, Router};
use sqlx::SqlitePool;

use crate::{
    db::{queries::categories::get_all_categories, Category},
    server::app::AppState,
};

use super::ApiResponse;

#[derive(Template, WebTemplate)]
#[template(path = "categories.html")]
struct CategoriesPage {
    categories: Vec<Category>,
}

async fn category_list(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesPage> {
    let categories = get_all_categories(&pool).await?;
    Ok(CategoriesPage { categories })
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(category_list))
        .with_state(state)
}
