// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Papel da conta. Clientes e admins já nascem aprovados;
// vendedores dependem de aprovação manual (ver is_approved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Seller,
    Admin,
}

// Endereço comercial do vendedor, guardado como JSONB dentro da própria conta.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

// Representa uma conta vinda do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub phone: Option<String>,
    pub role: UserRole,
    pub is_approved: bool,
    pub is_active: bool,
    pub profile_image: Option<String>,
    pub business_name: Option<String>,
    #[schema(value_type = Option<BusinessAddress>)]
    pub business_address: Option<sqlx::types::Json<BusinessAddress>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Endereço de entrega do cliente (coleção embutida na conta).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

// Papéis permitidos no auto-registro. "admin" é recusado já na
// desserialização: contas administrativas não nascem pela API pública.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegisterRole {
    #[default]
    User,
    Seller,
}

impl From<RegisterRole> for UserRole {
    fn from(role: RegisterRole) -> Self {
        match role {
            RegisterRole::User => UserRole::User,
            RegisterRole::Seller => UserRole::Seller,
        }
    }
}

// Dados para registro de uma nova conta
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    pub phone: Option<String>,

    #[serde(default)]
    pub role: RegisterRole,

    // Obrigatórios apenas quando role = seller (ver validate_consistency)
    pub business_name: Option<String>,
    pub business_address: Option<BusinessAddress>,
}

impl RegisterUserPayload {
    // Regra: vendedor precisa informar o nome do negócio.
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.role == RegisterRole::Seller
            && self.business_name.as_deref().is_none_or(str::is_empty)
        {
            let mut err = ValidationError::new("BusinessNameRequiredForSeller");
            err.message = Some("O nome do negócio é obrigatório para vendedores.".into());
            return Err(err);
        }
        Ok(())
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Atualização de perfil (todos os campos opcionais)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub profile_image: Option<String>,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: Option<String>,
}

// Endereço de entrega (corpo completo, tanto para criar quanto para atualizar)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddressPayload {
    #[validate(length(min = 1, message = "A rua é obrigatória."))]
    pub street: String,
    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub city: String,
    #[validate(length(min = 1, message = "O estado é obrigatório."))]
    pub state: String,
    #[validate(length(min = 1, message = "O código postal é obrigatório."))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "O país é obrigatório."))]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

// Resposta de autenticação: resumo da conta + token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_approved: bool,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            is_approved: user.is_approved,
            token,
        }
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID da conta)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// Página de contas para a listagem administrativa
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<User>,
    pub page: i64,
    pub pages: i64,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_payload() -> RegisterUserPayload {
        RegisterUserPayload {
            name: "Maria".into(),
            email: "maria@example.com".into(),
            password: "segredo1".into(),
            phone: None,
            role: RegisterRole::User,
            business_name: None,
            business_address: None,
        }
    }

    #[test]
    fn register_rejects_invalid_email() {
        let mut payload = base_payload();
        payload.email = "nao-e-email".into();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn register_rejects_short_password() {
        let mut payload = base_payload();
        payload.password = "curta".into();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn register_rejects_admin_role_at_deserialization() {
        let body = serde_json::json!({
            "name": "Eve",
            "email": "eve@example.com",
            "password": "segredo1",
            "role": "admin"
        });
        assert!(serde_json::from_value::<RegisterUserPayload>(body).is_err());
    }

    #[test]
    fn register_rejects_unknown_fields() {
        let body = serde_json::json!({
            "name": "Maria",
            "email": "maria@example.com",
            "password": "segredo1",
            "isApproved": true
        });
        assert!(serde_json::from_value::<RegisterUserPayload>(body).is_err());
    }

    #[test]
    fn seller_registration_requires_business_name() {
        let mut payload = base_payload();
        payload.role = RegisterRole::Seller;
        assert!(payload.validate_consistency().is_err());

        payload.business_name = Some("Feira da Vila".into());
        assert!(payload.validate_consistency().is_ok());
    }
}
