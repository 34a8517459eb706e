pub mod auth;
pub mod cart;
pub mod category;
pub mod dashboard;
pub mod product;

use serde::Serialize;
use utoipa::ToSchema;

// Resposta padrão para operações que só confirmam um efeito.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
