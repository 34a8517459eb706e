// src/db/category_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::category::Category};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let maybe_category =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_category)
    }

    // Usado na criação de produto: a categoria precisa existir e estar ativa.
    pub async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let maybe_category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_category)
    }

    pub async fn list_active(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn create(
        &self,
        name: &str,
        description: &str,
        image: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, image, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(image)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_name)?;

        Ok(category)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        image: Option<&str>,
        parent_id: Option<Uuid>,
        is_active: Option<bool>,
    ) -> Result<Option<Category>, AppError> {
        let maybe_category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                image       = COALESCE($4, image),
                parent_id   = COALESCE($5, parent_id),
                is_active   = COALESCE($6, is_active),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(image)
        .bind(parent_id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_name)?;

        Ok(maybe_category)
    }

    // Remoção física; só é chamada quando nenhum produto ativo referencia
    // a categoria (ver AdminService::delete_category).
    pub async fn hard_delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let maybe_category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_category)
    }
}

fn map_unique_name(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("categories_name_key") {
            return AppError::CategoryAlreadyExists;
        }
    }
    e.into()
}
