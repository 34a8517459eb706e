// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{RequireApprovedSeller, RequireRole, SellerOnly},
    },
    models::{
        MessageResponse,
        product::{Dimensions, Product, ProductFilter, ProductPage, ProductView, Weight},
    },
};

// ---
// Validação customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// Paginação simples (listagens sem filtro de catálogo)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page_number: Option<i64>,
}

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    // URLs das imagens já hospedadas (o upload em si fica fora deste serviço)
    #[validate(length(max = 5, message = "No máximo 5 imagens por produto."))]
    #[serde(default)]
    pub images: Vec<String>,

    pub category: Uuid,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    #[serde(default)]
    pub count_in_stock: i32,

    #[serde(default)]
    pub materials: Vec<String>,

    pub dimensions: Option<Dimensions>,
    pub weight: Option<Weight>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(length(min = 1, message = "O tipo de artesanato é obrigatório."))]
    pub craft_type: String,

    #[validate(length(min = 1, message = "A região de origem é obrigatória."))]
    pub region: String,
}

// ---
// Payload: UpdateProduct (tudo opcional; campos ausentes não mudam)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "A descrição não pode ser vazia."))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,

    #[validate(length(max = 5, message = "No máximo 5 imagens por produto."))]
    pub images: Option<Vec<String>>,

    pub category: Option<Uuid>,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub count_in_stock: Option<i32>,

    pub materials: Option<Vec<String>>,
    pub dimensions: Option<Dimensions>,
    pub weight: Option<Weight>,
    pub tags: Option<Vec<String>>,
    pub craft_type: Option<String>,
    pub region: Option<String>,
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Página do catálogo (apenas produtos ativos)", body = ProductPage)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<ProductPage>, AppError> {
    let page = app_state.product_service.list_products(&filter).await?;
    Ok(Json(page))
}

// GET /api/products/top
#[utoipa::path(
    get,
    path = "/api/products/top",
    tag = "Products",
    responses(
        (status = 200, description = "5 produtos ativos mais bem avaliados", body = [ProductView])
    )
)]
pub async fn get_top_products(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let products = app_state.product_service.get_top().await?;
    Ok(Json(products))
}

// GET /api/products/featured
#[utoipa::path(
    get,
    path = "/api/products/featured",
    tag = "Products",
    responses(
        (status = 200, description = "Até 8 produtos ativos em destaque", body = [ProductView])
    )
)]
pub async fn get_featured_products(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let products = app_state.product_service.get_featured().await?;
    Ok(Json(products))
}

// GET /api/products/seller
#[utoipa::path(
    get,
    path = "/api/products/seller",
    tag = "Products",
    params(PageQuery),
    responses(
        (status = 200, description = "Produtos do vendedor autenticado (inclui desativados)", body = ProductPage),
        (status = 403, description = "Conta não é de vendedor")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_seller_products(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<SellerOnly>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProductPage>, AppError> {
    let page = app_state
        .product_service
        .seller_products(user.id, query.page_number)
        .await?;
    Ok(Json(page))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    responses(
        (status = 200, description = "Produto", body = ProductView),
        (status = 404, description = "Produto inexistente ou desativado")
    ),
    params(("id" = Uuid, Path, description = "ID do produto"))
)]
pub async fn get_product_by_id(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductView>, AppError> {
    let product = app_state.product_service.get_product(id).await?;
    Ok(Json(product))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Categoria inválida ou dados malformados"),
        (status = 403, description = "Vendedor não aprovado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireApprovedSeller,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .product_service
        .create_product(
            &user,
            payload.category,
            &payload.name,
            &payload.description,
            payload.price,
            &payload.images,
            payload.count_in_stock,
            &payload.materials,
            payload.dimensions,
            payload.weight,
            &payload.tags,
            &payload.craft_type,
            &payload.region,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 403, description = "Produto de outro vendedor"),
        (status = 404, description = "Produto não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do produto")),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireApprovedSeller,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .product_service
        .update_product(
            &user,
            id,
            payload.category,
            payload.name.as_deref(),
            payload.description.as_deref(),
            payload.price,
            payload.images.as_deref(),
            payload.count_in_stock,
            payload.materials.as_deref(),
            payload.dimensions,
            payload.weight,
            payload.tags.as_deref(),
            payload.craft_type.as_deref(),
            payload.region.as_deref(),
        )
        .await?;

    Ok(Json(product))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    responses(
        (status = 200, description = "Produto desativado (soft-delete)", body = MessageResponse),
        (status = 403, description = "Produto de outro vendedor"),
        (status = 404, description = "Produto não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do produto")),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireApprovedSeller,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.product_service.delete_product(&user, id).await?;
    Ok(Json(MessageResponse::new("Produto removido.")))
}
