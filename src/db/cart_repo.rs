// src/db/cart_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::cart::{Cart, CartLine},
};

// Repositório do agregado carrinho (carts + cart_items). As mutações
// recebem um executor para rodarem dentro da transação aberta pelo serviço.
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, AppError> {
        let maybe_cart = sqlx::query_as::<_, Cart>("SELECT * FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_cart)
    }

    // Criação preguiçosa: o ON CONFLICT cobre a corrida entre duas primeiras
    // requisições da mesma conta, devolvendo a linha existente.
    pub async fn find_or_create(&self, user_id: Uuid) -> Result<Cart, AppError> {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT ON CONSTRAINT carts_user_key
            DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(cart)
    }

    // Linhas do carrinho com os dados vivos do produto, em ordem de inclusão.
    pub async fn load_lines(&self, cart_id: Uuid) -> Result<Vec<CartLine>, AppError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT
                ci.product_id,
                ci.quantity,
                p.name,
                p.price,
                p.images,
                p.count_in_stock,
                p.is_active,
                u.name AS seller_name
            FROM cart_items ci
            JOIN products p ON ci.product_id = p.id
            LEFT JOIN users u ON p.seller_id = u.id
            WHERE ci.cart_id = $1
            ORDER BY ci.created_at ASC
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    // Semântica de "definir": linha existente tem a quantidade SUBSTITUÍDA,
    // não somada. Um único statement, atômico por carrinho.
    pub async fn upsert_item<'e, E>(
        &self,
        executor: E,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = EXCLUDED.quantity
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Sobrescreve a quantidade de uma linha que precisa existir;
    // devolve quantas linhas foram atingidas.
    pub async fn update_item<'e, E>(
        &self,
        executor: E,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn remove_item<'e, E>(
        &self,
        executor: E,
        cart_id: Uuid,
        product_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result =
            sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
                .bind(cart_id)
                .bind(product_id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn clear_items<'e, E>(&self, executor: E, cart_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn touch<'e, E>(&self, executor: E, cart_id: Uuid) -> Result<Cart, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cart = sqlx::query_as::<_, Cart>(
            "UPDATE carts SET updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(cart_id)
        .fetch_one(executor)
        .await?;
        Ok(cart)
    }
}
