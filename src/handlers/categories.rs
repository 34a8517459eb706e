// src/handlers/categories.rs

use axum::{Json, extract::State};

use crate::{common::error::AppError, config::AppState, models::category::Category};

// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "Categorias ativas, em ordem alfabética", body = [Category])
    )
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = app_state.product_service.list_categories().await?;
    Ok(Json(categories))
}
