// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::User};

// O middleware em si: resolve o bearer token para exatamente uma conta,
// antes de qualquer regra de negócio, e a deixa nas extensions da
// requisição. Quem checa papel/aprovação são os gates (middleware::rbac),
// não este guard.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let user = app_state.auth_service.validate_token(token).await?;

            // Insere a conta nos "extensions" da requisição
            request.extensions_mut().insert(user);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extrator para obter a conta autenticada diretamente nos handlers.
// Em rotas cobertas pelo auth_guard a conta já está nas extensions; em
// rotas mistas (ex.: GET público e POST protegido no mesmo caminho) o
// extrator resolve o token ele mesmo e guarda o resultado, para que os
// gates seguintes leiam a MESMA conta sem revalidar.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>() {
            return Ok(AuthenticatedUser(user.clone()));
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::InvalidToken)?;
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::InvalidToken)?;

        let app_state = AppState::from_ref(state);
        let user = app_state.auth_service.validate_token(token).await?;

        parts.extensions.insert(user.clone());
        Ok(AuthenticatedUser(user))
    }
}
