// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{DashboardStats, RecentOrder},
        product::Product,
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Rollups do painel em uma única transação (snapshot consistente).
    // Sem cache: cada chamada recalcula tudo.
    pub async fn get_stats(&self) -> Result<DashboardStats, AppError> {
        let mut tx = self.pool.begin().await?;

        let total_users: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'user'")
                .fetch_one(&mut *tx)
                .await?;

        let total_sellers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'seller'")
                .fetch_one(&mut *tx)
                .await?;

        let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;

        let total_orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&mut *tx)
            .await?;

        // Receita = soma dos pedidos efetivamente pagos.
        let total_revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_price), 0) FROM orders WHERE is_paid = TRUE",
        )
        .fetch_one(&mut *tx)
        .await?;

        let recent_orders = sqlx::query_as::<_, RecentOrder>(
            r#"
            SELECT o.id, u.name AS user_name, o.total_price, o.is_paid, o.created_at
            FROM orders o
            LEFT JOIN users u ON o.user_id = u.id
            ORDER BY o.created_at DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        // O painel é administrativo: o ranking não filtra por atividade.
        let top_products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products ORDER BY rating DESC LIMIT 5",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardStats {
            total_users,
            total_sellers,
            total_products,
            total_orders,
            total_revenue,
            recent_orders,
            top_products,
        })
    }
}
