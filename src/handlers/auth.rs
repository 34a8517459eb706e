// src/handlers/auth.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        MessageResponse,
        auth::{
            Address, AddressPayload, AuthResponse, LoginUserPayload, RegisterUserPayload,
            UpdateProfilePayload, User,
        },
    },
};

// Perfil da conta com os endereços de entrega embutidos.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub addresses: Vec<Address>,
}

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Conta criada", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Validação de consistência: vendedor precisa do nome do negócio.
    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("businessName", e);
        AppError::ValidationError(errors)
    })?;

    let (user, token) = app_state.auth_service.register_user(&payload).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(&user, token))))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Autenticado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas, conta desativada ou vendedor pendente")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (user, token) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse::new(&user, token)))
}

// GET /api/auth/profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Perfil da conta autenticada", body = ProfileResponse),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let addresses = app_state.auth_service.list_addresses(user.id).await?;
    Ok(Json(ProfileResponse { user, addresses }))
}

// PUT /api/auth/profile
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = "Auth",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado (com token novo)", body = AuthResponse),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (user, token) = app_state
        .auth_service
        .update_profile(user.id, &payload)
        .await?;

    Ok(Json(AuthResponse::new(&user, token)))
}

// POST /api/auth/address
#[utoipa::path(
    post,
    path = "/api/auth/address",
    tag = "Auth",
    request_body = AddressPayload,
    responses(
        (status = 201, description = "Endereço adicionado; devolve a coleção", body = [Address])
    ),
    security(("api_jwt" = []))
)]
pub async fn add_address(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AddressPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let addresses = app_state.auth_service.add_address(user.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(addresses)))
}

// PUT /api/auth/address/{id}
#[utoipa::path(
    put,
    path = "/api/auth/address/{id}",
    tag = "Auth",
    request_body = AddressPayload,
    responses(
        (status = 200, description = "Endereço atualizado; devolve a coleção", body = [Address]),
        (status = 404, description = "Endereço não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do endereço")),
    security(("api_jwt" = []))
)]
pub async fn update_address(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(address_id): Path<Uuid>,
    Json(payload): Json<AddressPayload>,
) -> Result<Json<Vec<Address>>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let addresses = app_state
        .auth_service
        .update_address(user.id, address_id, &payload)
        .await?;

    Ok(Json(addresses))
}

// DELETE /api/auth/address/{id}
#[utoipa::path(
    delete,
    path = "/api/auth/address/{id}",
    tag = "Auth",
    responses(
        (status = 200, description = "Endereço removido", body = MessageResponse),
        (status = 404, description = "Endereço não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do endereço")),
    security(("api_jwt" = []))
)]
pub async fn delete_address(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(address_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state
        .auth_service
        .delete_address(user.id, address_id)
        .await?;

    Ok(Json(MessageResponse::new("Endereço removido.")))
}
