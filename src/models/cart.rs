// src/models/cart.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Carrinho como está no banco (as linhas vivem em cart_items).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha do carrinho com os dados vivos do produto (preço e estoque no
// momento da leitura, não no momento da inclusão).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub name: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub count_in_stock: i32,
    pub is_active: bool,
    pub seller_name: Option<String>,
}

// O que os endpoints de carrinho devolvem: carrinho + linhas populadas.
// Os totais exibidos são informativos; o checkout revalida tudo.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartView {
    pub fn new(cart: Cart, items: Vec<CartLine>) -> Self {
        Self {
            id: cart.id,
            user_id: cart.user_id,
            items,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}
