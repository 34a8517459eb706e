// src/services/admin_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination},
    db::{CategoryRepository, DashboardRepository, ProductRepository, UserRepository},
    models::{
        auth::{User, UserPage, UserRole},
        category::Category,
        dashboard::DashboardStats,
        product::Product,
    },
};

// O que aconteceu com a categoria "excluída": removida de fato ou só
// desativada porque ainda há produto ativo apontando para ela.
#[derive(Debug, PartialEq, Eq)]
pub enum CategoryDeletion {
    Removed,
    Deactivated,
}

#[derive(Clone)]
pub struct AdminService {
    user_repo: UserRepository,
    product_repo: ProductRepository,
    category_repo: CategoryRepository,
    dashboard_repo: DashboardRepository,
}

impl AdminService {
    pub fn new(
        user_repo: UserRepository,
        product_repo: ProductRepository,
        category_repo: CategoryRepository,
        dashboard_repo: DashboardRepository,
    ) -> Self {
        Self {
            user_repo,
            product_repo,
            category_repo,
            dashboard_repo,
        }
    }

    // --- Contas ---

    pub async fn list_users(&self, page_number: Option<i64>) -> Result<UserPage, AppError> {
        let page = pagination::normalize_page(page_number);
        let count = self.user_repo.count_all().await?;
        let users = self.user_repo.list_paginated(page).await?;

        Ok(UserPage {
            users,
            page,
            pages: pagination::total_pages(count),
            count,
        })
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_user(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        role: Option<UserRole>,
        is_approved: Option<bool>,
        is_active: Option<bool>,
    ) -> Result<User, AppError> {
        self.user_repo
            .admin_update(id, name, email, phone, role, is_approved, is_active)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // Contas nunca são removidas fisicamente; desativar bloqueia o
    // próximo login e preserva o histórico.
    pub async fn deactivate_user(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .deactivate(id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // --- Ciclo de vida do vendedor ---

    pub async fn pending_sellers(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_pending_sellers().await
    }

    // Aprovar de novo um vendedor já aprovado é um no-op; "rejeitar" é
    // simplesmente deixar (ou voltar) is_approved = false.
    pub async fn approve_seller(&self, id: Uuid, approved: bool) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if user.role != UserRole::Seller {
            return Err(AppError::NotASeller);
        }

        self.user_repo
            .set_approval(id, approved)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // --- Painel ---

    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        self.dashboard_repo.get_stats().await
    }

    // --- Categorias ---

    pub async fn create_category(
        &self,
        name: &str,
        description: &str,
        image: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category, AppError> {
        self.category_repo
            .create(name, description, image, parent_id)
            .await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        image: Option<&str>,
        parent_id: Option<Uuid>,
        is_active: Option<bool>,
    ) -> Result<Category, AppError> {
        self.category_repo
            .update(id, name, description, image, parent_id, is_active)
            .await?
            .ok_or(AppError::CategoryNotFound)
    }

    // Categoria com produto ativo apontando para ela não pode sumir:
    // vira inativa. Sem referência ativa, sai de verdade.
    pub async fn delete_category(&self, id: Uuid) -> Result<CategoryDeletion, AppError> {
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        let active_refs = self.product_repo.count_active_in_category(id).await?;
        if active_refs > 0 {
            self.category_repo.deactivate(id).await?;
            return Ok(CategoryDeletion::Deactivated);
        }

        self.category_repo.hard_delete(id).await?;
        Ok(CategoryDeletion::Removed)
    }

    // --- Moderação de produtos ---

    pub async fn feature_product(&self, id: Uuid, featured: bool) -> Result<Product, AppError> {
        self.product_repo
            .set_featured(id, featured)
            .await?
            .ok_or(AppError::ProductNotFound)
    }
}
