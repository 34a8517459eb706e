// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::product::Product;

// Pedido como está no banco. O fluxo de checkout não pertence a este
// serviço; os registros existem para os somatórios administrativos.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Pedido recente com o nome do comprador resolvido.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: Uuid,
    pub user_name: Option<String>,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

// Os números do painel administrativo. Sem cache: cada chamada
// recalcula tudo a partir do estado atual das coleções.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_sellers: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub recent_orders: Vec<RecentOrder>,
    pub top_products: Vec<Product>,
}
