// src/services/product_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination},
    db::{CategoryRepository, ProductRepository},
    models::{
        auth::{User, UserRole},
        category::Category,
        product::{Dimensions, Product, ProductFilter, ProductPage, ProductView, Weight},
    },
};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    category_repo: CategoryRepository,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, category_repo: CategoryRepository) -> Self {
        Self {
            product_repo,
            category_repo,
        }
    }

    // Catálogo público: filtros AND-combinados, só produtos ativos, página
    // fixa de 10. Página além do intervalo devolve lista vazia, não erro.
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<ProductPage, AppError> {
        let page = pagination::normalize_page(filter.page_number);
        let (products, count) = self.product_repo.search(filter, page).await?;
        Ok(ProductPage::new(products, page, count))
    }

    // Produto desativado é invisível no lookup público: mesmo 404 de ausente.
    pub async fn get_product(&self, id: Uuid) -> Result<ProductView, AppError> {
        let product = self
            .product_repo
            .find_view_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if !product.is_active {
            return Err(AppError::ProductNotFound);
        }
        Ok(product)
    }

    pub async fn get_featured(&self) -> Result<Vec<ProductView>, AppError> {
        self.product_repo.list_featured().await
    }

    pub async fn get_top(&self) -> Result<Vec<ProductView>, AppError> {
        self.product_repo.list_top_rated().await
    }

    // O vendedor enxerga o próprio catálogo inteiro, inclusive desativados.
    pub async fn seller_products(
        &self,
        seller_id: Uuid,
        page_number: Option<i64>,
    ) -> Result<ProductPage, AppError> {
        let page = pagination::normalize_page(page_number);
        let (products, count) = self.product_repo.list_by_seller(seller_id, page).await?;
        Ok(ProductPage::new(products, page, count))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_product(
        &self,
        seller: &User,
        category_id: Uuid,
        name: &str,
        description: &str,
        price: Decimal,
        images: &[String],
        count_in_stock: i32,
        materials: &[String],
        dimensions: Option<Dimensions>,
        weight: Option<Weight>,
        tags: &[String],
        craft_type: &str,
        region: &str,
    ) -> Result<Product, AppError> {
        // A categoria referenciada precisa existir e estar ativa.
        self.category_repo
            .find_active_by_id(category_id)
            .await?
            .ok_or(AppError::InvalidCategory)?;

        self.product_repo
            .create(
                seller.id,
                category_id,
                name,
                description,
                price,
                images,
                count_in_stock,
                materials,
                dimensions.map(sqlx::types::Json),
                weight.map(sqlx::types::Json),
                tags,
                craft_type,
                region,
            )
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_product(
        &self,
        caller: &User,
        product_id: Uuid,
        category_id: Option<Uuid>,
        name: Option<&str>,
        description: Option<&str>,
        price: Option<Decimal>,
        images: Option<&[String]>,
        count_in_stock: Option<i32>,
        materials: Option<&[String]>,
        dimensions: Option<Dimensions>,
        weight: Option<Weight>,
        tags: Option<&[String]>,
        craft_type: Option<&str>,
        region: Option<&str>,
    ) -> Result<Product, AppError> {
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        ensure_can_modify(&product, caller)?;

        // Troca de categoria revalida a nova referência.
        if let Some(new_category) = category_id {
            if new_category != product.category_id {
                self.category_repo
                    .find_active_by_id(new_category)
                    .await?
                    .ok_or(AppError::InvalidCategory)?;
            }
        }

        self.product_repo
            .update(
                product_id,
                category_id,
                name,
                description,
                price,
                images,
                count_in_stock,
                materials,
                dimensions.map(sqlx::types::Json),
                weight.map(sqlx::types::Json),
                tags,
                craft_type,
                region,
            )
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    // Exclusão é sempre um soft-delete: carrinhos e pedidos históricos
    // continuam resolvendo a referência.
    pub async fn delete_product(&self, caller: &User, product_id: Uuid) -> Result<(), AppError> {
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        ensure_can_modify(&product, caller)?;

        self.product_repo
            .soft_delete(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.category_repo.list_active().await
    }
}

// Dono imutável: só o vendedor que criou o produto (ou um admin) pode mexer.
fn ensure_can_modify(product: &Product, caller: &User) -> Result<(), AppError> {
    if product.seller_id != caller.id && caller.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Você só pode alterar os próprios produtos.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn seller(id: Uuid, role: UserRole) -> User {
        User {
            id,
            name: "Vendedor".into(),
            email: "v@example.com".into(),
            password_hash: "hash".into(),
            phone: None,
            role,
            is_approved: true,
            is_active: true,
            profile_image: None,
            business_name: None,
            business_address: None,
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    fn product_of(seller_id: Uuid) -> Product {
        Product {
            id: Uuid::new_v4(),
            seller_id,
            category_id: Uuid::new_v4(),
            name: "Vaso de cerâmica".into(),
            description: "Feito à mão".into(),
            price: Decimal::new(12000, 2),
            images: vec![],
            count_in_stock: 3,
            rating: Decimal::ZERO,
            num_reviews: 0,
            is_featured: false,
            is_active: true,
            materials: vec![],
            dimensions: None,
            weight: None,
            tags: vec![],
            craft_type: "cerâmica".into(),
            region: "Vale do Jequitinhonha".into(),
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn owner_can_modify_own_product() {
        let owner_id = Uuid::new_v4();
        let product = product_of(owner_id);
        assert!(ensure_can_modify(&product, &seller(owner_id, UserRole::Seller)).is_ok());
    }

    #[test]
    fn other_seller_cannot_modify() {
        let product = product_of(Uuid::new_v4());
        let intruder = seller(Uuid::new_v4(), UserRole::Seller);
        assert!(matches!(
            ensure_can_modify(&product, &intruder),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_can_modify_any_product() {
        let product = product_of(Uuid::new_v4());
        let admin = seller(Uuid::new_v4(), UserRole::Admin);
        assert!(ensure_can_modify(&product, &admin).is_ok());
    }
}
