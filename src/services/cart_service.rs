// src/services/cart_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CartRepository, ProductRepository},
    models::cart::CartView,
};

// O agregado carrinho: uma conta → um carrinho, criado sob demanda.
// Toda mutação revalida contra o estado vivo do produto; não há reserva
// de estoque, a checagem vale só para o instante da mutação.
#[derive(Clone)]
pub struct CartService {
    cart_repo: CartRepository,
    product_repo: ProductRepository,
    pool: PgPool,
}

impl CartService {
    pub fn new(cart_repo: CartRepository, product_repo: ProductRepository, pool: PgPool) -> Self {
        Self {
            cart_repo,
            product_repo,
            pool,
        }
    }

    // Nunca falha: sem carrinho, cria um vazio e devolve.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<CartView, AppError> {
        let cart = self.cart_repo.find_or_create(user_id).await?;
        let items = self.cart_repo.load_lines(cart.id).await?;
        Ok(CartView::new(cart, items))
    }

    // Semântica de "definir": se a linha já existe, a quantidade é
    // substituída (não somada).
    pub async fn add_or_set_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, AppError> {
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if !product.is_active {
            return Err(AppError::ProductUnavailable);
        }
        ensure_stock(product.count_in_stock, quantity)?;

        let cart = self.cart_repo.find_or_create(user_id).await?;

        let mut tx = self.pool.begin().await?;
        self.cart_repo
            .upsert_item(&mut *tx, cart.id, product_id, quantity)
            .await?;
        let cart = self.cart_repo.touch(&mut *tx, cart.id).await?;
        tx.commit().await?;

        let items = self.cart_repo.load_lines(cart.id).await?;
        Ok(CartView::new(cart, items))
    }

    pub async fn update_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, AppError> {
        let product = self
            .product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        ensure_stock(product.count_in_stock, quantity)?;

        let cart = self
            .cart_repo
            .find_by_user(user_id)
            .await?
            .ok_or(AppError::CartNotFound)?;

        let mut tx = self.pool.begin().await?;
        let updated = self
            .cart_repo
            .update_item(&mut *tx, cart.id, product_id, quantity)
            .await?;
        if updated == 0 {
            // Sem linha para esse produto; o rollback descarta o touch.
            return Err(AppError::CartItemNotFound);
        }
        let cart = self.cart_repo.touch(&mut *tx, cart.id).await?;
        tx.commit().await?;

        let items = self.cart_repo.load_lines(cart.id).await?;
        Ok(CartView::new(cart, items))
    }

    // Idempotente: remover linha ausente não é erro, o carrinho volta como está.
    pub async fn remove_item(&self, user_id: Uuid, product_id: Uuid) -> Result<CartView, AppError> {
        let cart = self
            .cart_repo
            .find_by_user(user_id)
            .await?
            .ok_or(AppError::CartNotFound)?;

        let mut tx = self.pool.begin().await?;
        let removed = self
            .cart_repo
            .remove_item(&mut *tx, cart.id, product_id)
            .await?;
        // Linha ausente: devolve o carrinho exatamente como está.
        let cart = if removed > 0 {
            self.cart_repo.touch(&mut *tx, cart.id).await?
        } else {
            cart
        };
        tx.commit().await?;

        let items = self.cart_repo.load_lines(cart.id).await?;
        Ok(CartView::new(cart, items))
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<CartView, AppError> {
        let cart = self
            .cart_repo
            .find_by_user(user_id)
            .await?
            .ok_or(AppError::CartNotFound)?;

        let mut tx = self.pool.begin().await?;
        self.cart_repo.clear_items(&mut *tx, cart.id).await?;
        let cart = self.cart_repo.touch(&mut *tx, cart.id).await?;
        tx.commit().await?;

        Ok(CartView::new(cart, Vec::new()))
    }
}

// A quantidade pedida não pode passar do estoque atual do produto.
// (A checagem vale para o momento da mutação: dois carrinhos concorrentes
// podem passar pela mesma unidade restante; o checkout revalida.)
fn ensure_stock(count_in_stock: i32, requested: i32) -> Result<(), AppError> {
    if requested > count_in_stock {
        return Err(AppError::InsufficientStock);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requesting_more_than_stock_fails() {
        assert!(matches!(
            ensure_stock(5, 6),
            Err(AppError::InsufficientStock)
        ));
    }

    #[test]
    fn requesting_exactly_the_stock_succeeds() {
        assert!(ensure_stock(5, 5).is_ok());
    }

    #[test]
    fn requesting_less_than_stock_succeeds() {
        assert!(ensure_stock(5, 1).is_ok());
    }

    #[test]
    fn zero_stock_rejects_any_quantity() {
        assert!(matches!(
            ensure_stock(0, 1),
            Err(AppError::InsufficientStock)
        ));
    }
}
