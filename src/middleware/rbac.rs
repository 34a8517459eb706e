// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

/// 1. O Trait que define o papel exigido por uma rota
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> UserRole;
    fn denied_message() -> &'static str;
}

/// 2. O Extractor (Guardião). Avaliado na ordem dos argumentos do handler;
/// o primeiro gate que falha encerra a requisição.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        if !has_role(user, T::role()) {
            return Err(AppError::Forbidden(T::denied_message()));
        }

        Ok(RequireRole(PhantomData))
    }
}

// Vendedor aprovado: gate próprio porque o papel sozinho não basta para
// listar produtos. Leitura pura da conta resolvida, sem banco.
pub struct RequireApprovedSeller;

impl<S> FromRequestParts<S> for RequireApprovedSeller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        if !is_approved_seller(user) {
            return Err(AppError::Forbidden(
                "Conta de vendedor ainda não aprovada.",
            ));
        }

        Ok(RequireApprovedSeller)
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn role() -> UserRole {
        UserRole::Admin
    }
    fn denied_message() -> &'static str {
        "Acesso restrito a administradores."
    }
}

pub struct SellerOnly;
impl RoleDef for SellerOnly {
    fn role() -> UserRole {
        UserRole::Seller
    }
    fn denied_message() -> &'static str {
        "Acesso restrito a vendedores."
    }
}

// Predicados puros sobre a conta resolvida.
fn has_role(user: &User, role: UserRole) -> bool {
    user.role == role
}

fn is_approved_seller(user: &User) -> bool {
    user.role == UserRole::Seller && user.is_approved
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn account(role: UserRole, is_approved: bool) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Conta".into(),
            email: "conta@example.com".into(),
            password_hash: "hash".into(),
            phone: None,
            role,
            is_approved,
            is_active: true,
            profile_image: None,
            business_name: None,
            business_address: None,
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn has_role_is_exact_match() {
        assert!(has_role(&account(UserRole::Admin, true), UserRole::Admin));
        assert!(!has_role(&account(UserRole::Seller, true), UserRole::Admin));
        assert!(!has_role(&account(UserRole::User, true), UserRole::Seller));
    }

    #[test]
    fn approved_seller_needs_role_and_flag() {
        assert!(is_approved_seller(&account(UserRole::Seller, true)));
        assert!(!is_approved_seller(&account(UserRole::Seller, false)));
        // Admin aprovado não é vendedor aprovado.
        assert!(!is_approved_seller(&account(UserRole::Admin, true)));
    }
}
