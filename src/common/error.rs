use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante carrega o status HTTP fixo da taxonomia do serviço:
// 401 / 403 / 404 / 400 / 409 / 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- 401: não autenticado ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Conta desativada")]
    AccountDeactivated,

    #[error("Vendedor pendente de aprovação")]
    SellerPendingApproval,

    // --- 403: autenticado, mas sem permissão ---
    #[error("Acesso negado: {0}")]
    Forbidden(&'static str),

    // --- 404: entidade ausente ou desativada ---
    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Carrinho não encontrado")]
    CartNotFound,

    #[error("Item não encontrado no carrinho")]
    CartItemNotFound,

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Endereço não encontrado")]
    AddressNotFound,

    // --- 400: regra de negócio ---
    #[error("Produto indisponível")]
    ProductUnavailable,

    #[error("Estoque insuficiente")]
    InsufficientStock,

    #[error("Categoria inválida")]
    InvalidCategory,

    #[error("A conta não é de um vendedor")]
    NotASeller,

    // --- 409: conflito de campo único ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Categoria já existe")]
    CategoryAlreadyExists,

    // --- 500 ---
    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_)
            | Self::ProductUnavailable
            | Self::InsufficientStock
            | Self::InvalidCategory
            | Self::NotASeller => StatusCode::BAD_REQUEST,

            Self::InvalidCredentials
            | Self::InvalidToken
            | Self::AccountDeactivated
            | Self::SellerPendingApproval => StatusCode::UNAUTHORIZED,

            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            Self::UserNotFound
            | Self::ProductNotFound
            | Self::CartNotFound
            | Self::CartItemNotFound
            | Self::CategoryNotFound
            | Self::AddressNotFound => StatusCode::NOT_FOUND,

            Self::EmailAlreadyExists | Self::CategoryAlreadyExists => StatusCode::CONFLICT,

            Self::DatabaseError(_)
            | Self::InternalServerError(_)
            | Self::BcryptError(_)
            | Self::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Validação retorna todos os detalhes por campo.
        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": "Um ou mais campos são inválidos.",
                "details": details,
            }));
            return (status, body).into_response();
        }

        let error_message = match &self {
            AppError::InvalidCredentials => "E-mail ou senha inválidos.",
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.",
            AppError::AccountDeactivated => {
                "Conta desativada. Entre em contato com o suporte."
            }
            AppError::SellerPendingApproval => "Conta de vendedor pendente de aprovação.",
            AppError::Forbidden(msg) => msg,
            AppError::UserNotFound => "Usuário não encontrado.",
            AppError::ProductNotFound => "Produto não encontrado.",
            AppError::CartNotFound => "Carrinho não encontrado.",
            AppError::CartItemNotFound => "Item não encontrado no carrinho.",
            AppError::CategoryNotFound => "Categoria não encontrada.",
            AppError::AddressNotFound => "Endereço não encontrado.",
            AppError::ProductUnavailable => "Produto não está mais disponível.",
            AppError::InsufficientStock => "Estoque insuficiente para a quantidade pedida.",
            AppError::InvalidCategory => "Categoria inválida ou inativa.",
            AppError::NotASeller => "A conta indicada não é de um vendedor.",
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.",
            AppError::CategoryAlreadyExists => "Já existe uma categoria com este nome.",

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe só o genérico.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado."
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_fixed_statuses() {
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("sem acesso").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::ProductNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InsufficientStock.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ProductUnavailable.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::EmailAlreadyExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn login_gate_errors_are_unauthorized_not_forbidden() {
        // A recusa de login (conta desativada / vendedor pendente) responde 401,
        // como o contrato da API define; 403 fica para os gates de rota.
        assert_eq!(
            AppError::AccountDeactivated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::SellerPendingApproval.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
