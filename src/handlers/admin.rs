// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::products::PageQuery,
    middleware::rbac::{AdminOnly, RequireRole},
    models::{
        MessageResponse,
        auth::{User, UserPage, UserRole},
        category::Category,
        dashboard::DashboardStats,
        product::Product,
    },
    services::admin_service::CategoryDeletion,
};

// ---
// Payloads administrativos
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdminUpdateUserPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub is_approved: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApproveSellerPayload {
    pub approved: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeatureProductPayload {
    pub featured: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    pub image: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCategoryPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "A descrição não pode ser vazia."))]
    pub description: Option<String>,

    pub image: Option<String>,
    pub parent_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

// Resumo devolvido pela aprovação de vendedor.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_approved: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveSellerResponse {
    pub message: String,
    pub seller: SellerSummary,
}

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(PageQuery),
    responses(
        (status = 200, description = "Página de contas", body = UserPage),
        (status = 403, description = "Acesso restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_users(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserPage>, AppError> {
    let page = app_state.admin_service.list_users(query.page_number).await?;
    Ok(Json(page))
}

// GET /api/admin/users/{id}
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    responses(
        (status = 200, description = "Conta", body = User),
        (status = 404, description = "Conta não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da conta")),
    security(("api_jwt" = []))
)]
pub async fn get_user_by_id(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = app_state.admin_service.get_user(id).await?;
    Ok(Json(user))
}

// PUT /api/admin/users/{id}
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    request_body = AdminUpdateUserPayload,
    responses(
        (status = 200, description = "Conta atualizada", body = User),
        (status = 404, description = "Conta não encontrada"),
        (status = 409, description = "E-mail já em uso")
    ),
    params(("id" = Uuid, Path, description = "ID da conta")),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .admin_service
        .update_user(
            id,
            payload.name.as_deref(),
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.role,
            payload.is_approved,
            payload.is_active,
        )
        .await?;

    Ok(Json(user))
}

// DELETE /api/admin/users/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    responses(
        (status = 200, description = "Conta desativada (nunca removida)", body = MessageResponse),
        (status = 404, description = "Conta não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da conta")),
    security(("api_jwt" = []))
)]
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.admin_service.deactivate_user(id).await?;
    Ok(Json(MessageResponse::new("Usuário desativado.")))
}

// GET /api/admin/sellers/pending
#[utoipa::path(
    get,
    path = "/api/admin/sellers/pending",
    tag = "Admin",
    responses(
        (status = 200, description = "Vendedores ativos aguardando aprovação", body = [User])
    ),
    security(("api_jwt" = []))
)]
pub async fn get_pending_sellers(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
) -> Result<Json<Vec<User>>, AppError> {
    let sellers = app_state.admin_service.pending_sellers().await?;
    Ok(Json(sellers))
}

// PUT /api/admin/sellers/{id}/approve
#[utoipa::path(
    put,
    path = "/api/admin/sellers/{id}/approve",
    tag = "Admin",
    request_body = ApproveSellerPayload,
    responses(
        (status = 200, description = "Aprovação registrada", body = ApproveSellerResponse),
        (status = 400, description = "A conta não é de um vendedor"),
        (status = 404, description = "Conta não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID do vendedor")),
    security(("api_jwt" = []))
)]
pub async fn approve_seller(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveSellerPayload>,
) -> Result<Json<ApproveSellerResponse>, AppError> {
    let seller = app_state
        .admin_service
        .approve_seller(id, payload.approved)
        .await?;

    let message = if payload.approved {
        "Vendedor aprovado."
    } else {
        "Vendedor rejeitado."
    };

    Ok(Json(ApproveSellerResponse {
        message: message.to_string(),
        seller: SellerSummary {
            id: seller.id,
            name: seller.name,
            email: seller.email,
            is_approved: seller.is_approved,
        },
    }))
}

// GET /api/admin/dashboard
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Admin",
    responses(
        (status = 200, description = "Contagens, receita e rankings do painel", body = DashboardStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard_stats(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = app_state.admin_service.dashboard().await?;
    Ok(Json(stats))
}

// POST /api/admin/categories
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    tag = "Admin",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 409, description = "Nome de categoria já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state
        .admin_service
        .create_category(
            &payload.name,
            &payload.description,
            payload.image.as_deref(),
            payload.parent_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

// PUT /api/admin/categories/{id}
#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    tag = "Admin",
    request_body = UpdateCategoryPayload,
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da categoria")),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Result<Json<Category>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state
        .admin_service
        .update_category(
            id,
            payload.name.as_deref(),
            payload.description.as_deref(),
            payload.image.as_deref(),
            payload.parent_id,
            payload.is_active,
        )
        .await?;

    Ok(Json(category))
}

// DELETE /api/admin/categories/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    tag = "Admin",
    responses(
        (status = 200, description = "Removida, ou desativada se ainda tem produto ativo", body = MessageResponse),
        (status = 404, description = "Categoria não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da categoria")),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let outcome = app_state.admin_service.delete_category(id).await?;

    let message = match outcome {
        CategoryDeletion::Removed => "Categoria removida.",
        CategoryDeletion::Deactivated => "Categoria marcada como inativa.",
    };

    Ok(Json(MessageResponse::new(message)))
}

// PUT /api/admin/products/{id}/feature
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}/feature",
    tag = "Admin",
    request_body = FeatureProductPayload,
    responses(
        (status = 200, description = "Flag de destaque atualizada", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do produto")),
    security(("api_jwt" = []))
)]
pub async fn feature_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeatureProductPayload>,
) -> Result<Json<Product>, AppError> {
    let product = app_state
        .admin_service
        .feature_product(id, payload.featured)
        .await?;

    Ok(Json(product))
}
