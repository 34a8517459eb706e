// src/handlers/cart.rs

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{MessageResponse, cart::CartView},
};

// ---
// Payload: AddToCart
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddToCartPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCartItemPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    pub quantity: i32,
}

// GET /api/cart
#[utoipa::path(
    get,
    path = "/api/cart",
    tag = "Cart",
    responses(
        (status = 200, description = "Carrinho da conta (cria um vazio se não existir)", body = CartView)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cart(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<CartView>, AppError> {
    let cart = app_state.cart_service.get_or_create(user.id).await?;
    Ok(Json(cart))
}

// POST /api/cart
#[utoipa::path(
    post,
    path = "/api/cart",
    tag = "Cart",
    request_body = AddToCartPayload,
    responses(
        (status = 200, description = "Linha incluída ou quantidade substituída", body = CartView),
        (status = 400, description = "Produto indisponível ou estoque insuficiente"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_to_cart(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AddToCartPayload>,
) -> Result<Json<CartView>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cart = app_state
        .cart_service
        .add_or_set_item(user.id, payload.product_id, payload.quantity)
        .await?;

    Ok(Json(cart))
}

// PUT /api/cart/{productId}
#[utoipa::path(
    put,
    path = "/api/cart/{productId}",
    tag = "Cart",
    request_body = UpdateCartItemPayload,
    responses(
        (status = 200, description = "Quantidade sobrescrita", body = CartView),
        (status = 400, description = "Estoque insuficiente"),
        (status = 404, description = "Produto, carrinho ou linha inexistente")
    ),
    params(("productId" = Uuid, Path, description = "ID do produto no carrinho")),
    security(("api_jwt" = []))
)]
pub async fn update_cart_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemPayload>,
) -> Result<Json<CartView>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cart = app_state
        .cart_service
        .update_quantity(user.id, product_id, payload.quantity)
        .await?;

    Ok(Json(cart))
}

// DELETE /api/cart/{productId}
#[utoipa::path(
    delete,
    path = "/api/cart/{productId}",
    tag = "Cart",
    responses(
        (status = 200, description = "Linha removida (remover linha ausente é no-op)", body = CartView),
        (status = 404, description = "Carrinho não encontrado")
    ),
    params(("productId" = Uuid, Path, description = "ID do produto no carrinho")),
    security(("api_jwt" = []))
)]
pub async fn remove_from_cart(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(product_id): Path<Uuid>,
) -> Result<Json<CartView>, AppError> {
    let cart = app_state
        .cart_service
        .remove_item(user.id, product_id)
        .await?;

    Ok(Json(cart))
}

// DELETE /api/cart
#[utoipa::path(
    delete,
    path = "/api/cart",
    tag = "Cart",
    responses(
        (status = 200, description = "Carrinho esvaziado", body = MessageResponse),
        (status = 404, description = "Carrinho não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn clear_cart(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.cart_service.clear(user.id).await?;
    Ok(Json(MessageResponse::new("Carrinho esvaziado.")))
}
