// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination},
    models::auth::{Address, BusinessAddress, User, UserRole},
};

// O repositório de contas, responsável por todas as interações com as
// tabelas 'users' e 'addresses'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca uma conta pelo e-mail (inclui o hash da senha, para o login)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca uma conta pelo ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Cria uma nova conta, com tratamento específico para e-mail duplicado.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        phone: Option<&str>,
        role: UserRole,
        is_approved: bool,
        business_name: Option<&str>,
        business_address: Option<sqlx::types::Json<BusinessAddress>>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                name, email, password_hash, phone, role,
                is_approved, business_name, business_address
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .bind(role)
        .bind(is_approved)
        .bind(business_name)
        .bind(business_address)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_email)?;

        Ok(user)
    }

    // Atualização de perfil pelo próprio dono; campos ausentes ficam como estão.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        profile_image: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name          = COALESCE($2, name),
                email         = COALESCE($3, email),
                phone         = COALESCE($4, phone),
                profile_image = COALESCE($5, profile_image),
                password_hash = COALESCE($6, password_hash),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(profile_image)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_email)?;

        Ok(maybe_user)
    }

    // Atualização administrativa: papel e flags de status inclusos.
    #[allow(clippy::too_many_arguments)]
    pub async fn admin_update(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        role: Option<UserRole>,
        is_approved: Option<bool>,
        is_active: Option<bool>,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name        = COALESCE($2, name),
                email       = COALESCE($3, email),
                phone       = COALESCE($4, phone),
                role        = COALESCE($5, role),
                is_approved = COALESCE($6, is_approved),
                is_active   = COALESCE($7, is_active),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(role)
        .bind(is_approved)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_email)?;

        Ok(maybe_user)
    }

    // "Excluir" uma conta é sempre um soft-delete.
    pub async fn deactivate(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn set_approval(
        &self,
        id: Uuid,
        approved: bool,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_approved = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn list_paginated(&self, page: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(pagination::PAGE_SIZE)
        .bind(pagination::offset(page))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // Vendedores aguardando aprovação (apenas contas ativas)
    pub async fn list_pending_sellers(&self) -> Result<Vec<User>, AppError> {
        let sellers = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE role = 'seller' AND is_approved = FALSE AND is_active = TRUE
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sellers)
    }

    // --- Endereços ---

    pub async fn list_addresses(&self, user_id: Uuid) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(addresses)
    }

    // Zera o padrão anterior; faz parte da mesma transação do insert/update
    // que define um novo padrão (invariante: no máximo um por conta).
    pub async fn clear_default_addresses<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_address<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        street: &str,
        city: &str,
        state: &str,
        postal_code: &str,
        country: &str,
        is_default: bool,
    ) -> Result<Address, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (user_id, street, city, state, postal_code, country, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(street)
        .bind(city)
        .bind(state)
        .bind(postal_code)
        .bind(country)
        .bind(is_default)
        .fetch_one(executor)
        .await?;
        Ok(address)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_address<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        address_id: Uuid,
        street: &str,
        city: &str,
        state: &str,
        postal_code: &str,
        country: &str,
        is_default: bool,
    ) -> Result<Option<Address>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_address = sqlx::query_as::<_, Address>(
            r#"
            UPDATE addresses SET
                street = $3, city = $4, state = $5,
                postal_code = $6, country = $7, is_default = $8
            WHERE id = $2 AND user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(address_id)
        .bind(street)
        .bind(city)
        .bind(state)
        .bind(postal_code)
        .bind(country)
        .bind(is_default)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_address)
    }

    pub async fn delete_address(
        &self,
        user_id: Uuid,
        address_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(address_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// Converte violação de chave única em erro de conflito da taxonomia.
fn map_unique_email(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
            return AppError::EmailAlreadyExists;
        }
    }
    e.into()
}
