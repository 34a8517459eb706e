// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination},
    models::product::{Dimensions, Product, ProductFilter, ProductView, Weight},
};

// Colunas base das consultas "populadas" (nome da categoria e do vendedor
// resolvidos por join, nunca desnormalizados).
const VIEW_SELECT: &str = r#"
SELECT p.*, c.name AS category_name, u.name AS seller_name
FROM products p
LEFT JOIN categories c ON p.category_id = c.id
LEFT JOIN users u ON p.seller_id = u.id
"#;

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca paginada do catálogo. Monta o mesmo WHERE duas vezes: uma para o
    // COUNT (total de correspondências) e outra para a página pedida.
    pub async fn search(
        &self,
        filter: &ProductFilter,
        page: i64,
    ) -> Result<(Vec<ProductView>, i64), AppError> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut count_query, filter);
        let count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::new(VIEW_SELECT);
        push_filters(&mut query, filter);
        query.push(" ORDER BY ");
        query.push(sort_clause(filter.sort_by.as_deref(), filter.order.as_deref()));
        query.push(" LIMIT ");
        query.push_bind(pagination::PAGE_SIZE);
        query.push(" OFFSET ");
        query.push_bind(pagination::offset(page));

        let products = query
            .build_query_as::<ProductView>()
            .fetch_all(&self.pool)
            .await?;

        Ok((products, count))
    }

    // Lookup direto, sem filtro de atividade: quem decide a visibilidade de
    // um produto desativado é a camada de serviço.
    pub async fn find_view_by_id(&self, id: Uuid) -> Result<Option<ProductView>, AppError> {
        let sql = format!("{VIEW_SELECT} WHERE p.id = $1");
        let maybe_product = sqlx::query_as::<_, ProductView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_product)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_product)
    }

    // Vitrine: ativos e marcados como destaque, no máximo 8.
    pub async fn list_featured(&self) -> Result<Vec<ProductView>, AppError> {
        let sql = format!(
            "{VIEW_SELECT} WHERE p.is_active = TRUE AND p.is_featured = TRUE \
             ORDER BY p.created_at DESC LIMIT 8"
        );
        let products = sqlx::query_as::<_, ProductView>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    // Melhores avaliados entre os ativos, no máximo 5.
    pub async fn list_top_rated(&self) -> Result<Vec<ProductView>, AppError> {
        let sql = format!(
            "{VIEW_SELECT} WHERE p.is_active = TRUE ORDER BY p.rating DESC LIMIT 5"
        );
        let products = sqlx::query_as::<_, ProductView>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    // Listagem do próprio vendedor: inclui produtos desativados.
    pub async fn list_by_seller(
        &self,
        seller_id: Uuid,
        page: i64,
    ) -> Result<(Vec<ProductView>, i64), AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE seller_id = $1")
                .bind(seller_id)
                .fetch_one(&self.pool)
                .await?;

        let sql = format!(
            "{VIEW_SELECT} WHERE p.seller_id = $1 \
             ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        );
        let products = sqlx::query_as::<_, ProductView>(&sql)
            .bind(seller_id)
            .bind(pagination::PAGE_SIZE)
            .bind(pagination::offset(page))
            .fetch_all(&self.pool)
            .await?;

        Ok((products, count))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        seller_id: Uuid,
        category_id: Uuid,
        name: &str,
        description: &str,
        price: Decimal,
        images: &[String],
        count_in_stock: i32,
        materials: &[String],
        dimensions: Option<sqlx::types::Json<Dimensions>>,
        weight: Option<sqlx::types::Json<Weight>>,
        tags: &[String],
        craft_type: &str,
        region: &str,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                seller_id, category_id, name, description, price, images,
                count_in_stock, materials, dimensions, weight, tags, craft_type, region
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(seller_id)
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(images)
        .bind(count_in_stock)
        .bind(materials)
        .bind(dimensions)
        .bind(weight)
        .bind(tags)
        .bind(craft_type)
        .bind(region)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    // Atualização parcial; o dono (seller_id) nunca muda depois da criação.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        category_id: Option<Uuid>,
        name: Option<&str>,
        description: Option<&str>,
        price: Option<Decimal>,
        images: Option<&[String]>,
        count_in_stock: Option<i32>,
        materials: Option<&[String]>,
        dimensions: Option<sqlx::types::Json<Dimensions>>,
        weight: Option<sqlx::types::Json<Weight>>,
        tags: Option<&[String]>,
        craft_type: Option<&str>,
        region: Option<&str>,
    ) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                category_id    = COALESCE($2, category_id),
                name           = COALESCE($3, name),
                description    = COALESCE($4, description),
                price          = COALESCE($5, price),
                images         = COALESCE($6, images),
                count_in_stock = COALESCE($7, count_in_stock),
                materials      = COALESCE($8, materials),
                dimensions     = COALESCE($9, dimensions),
                weight         = COALESCE($10, weight),
                tags           = COALESCE($11, tags),
                craft_type     = COALESCE($12, craft_type),
                region         = COALESCE($13, region),
                updated_at     = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(images)
        .bind(count_in_stock)
        .bind(materials)
        .bind(dimensions)
        .bind(weight)
        .bind(tags)
        .bind(craft_type)
        .bind(region)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_product)
    }

    // "Excluir" um produto é desativar: carrinhos e pedidos antigos ainda
    // apontam para ele.
    pub async fn soft_delete(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>(
            "UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_product)
    }

    pub async fn set_featured(
        &self,
        id: Uuid,
        featured: bool,
    ) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>(
            "UPDATE products SET is_featured = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(featured)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_product)
    }

    // Quantos produtos ativos ainda referenciam a categoria (decide entre
    // hard-delete e desativação).
    pub async fn count_active_in_category(&self, category_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE category_id = $1 AND is_active = TRUE",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

// Aplica os filtros do catálogo sobre o alias `p`. O predicado de atividade
// vem primeiro e incondicionalmente.
fn push_filters<'args>(query: &mut QueryBuilder<'args, Postgres>, filter: &ProductFilter) {
    query.push(" WHERE p.is_active = TRUE");

    if let Some(keyword) = filter.keyword.as_deref().filter(|k| !k.is_empty()) {
        let pattern = format!("%{keyword}%");
        query.push(" AND (p.name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR p.description ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR array_to_string(p.tags, ' ') ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
    if let Some(category) = filter.category {
        query.push(" AND p.category_id = ");
        query.push_bind(category);
    }
    if let Some(price_min) = filter.price_min {
        query.push(" AND p.price >= ");
        query.push_bind(price_min);
    }
    if let Some(price_max) = filter.price_max {
        query.push(" AND p.price <= ");
        query.push_bind(price_max);
    }
    if let Some(rating) = filter.rating {
        query.push(" AND p.rating >= ");
        query.push_bind(rating);
    }
    if let Some(craft_type) = filter.craft_type.as_deref().filter(|c| !c.is_empty()) {
        query.push(" AND p.craft_type = ");
        query.push_bind(craft_type.to_owned());
    }
    if let Some(region) = filter.region.as_deref().filter(|r| !r.is_empty()) {
        query.push(" AND p.region = ");
        query.push_bind(region.to_owned());
    }
}

// Ordenação com colunas em lista fechada; nada vindo do chamador é
// interpolado direto no SQL. Padrão: mais recentes primeiro.
fn sort_clause(sort_by: Option<&str>, order: Option<&str>) -> &'static str {
    let ascending = matches!(order, Some("asc"));
    match (sort_by, ascending) {
        (Some("name"), true) => "p.name ASC",
        (Some("name"), false) => "p.name DESC",
        (Some("price"), true) => "p.price ASC",
        (Some("price"), false) => "p.price DESC",
        (Some("rating"), true) => "p.rating ASC",
        (Some("rating"), false) => "p.rating DESC",
        (Some("createdAt"), true) => "p.created_at ASC",
        (_, _) => "p.created_at DESC",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_always_include_active_predicate() {
        let filter = ProductFilter::default();
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut query, &filter);
        assert!(query.sql().contains("p.is_active = TRUE"));
    }

    #[test]
    fn keyword_filter_searches_name_description_and_tags() {
        let filter = ProductFilter {
            keyword: Some("cerâmica".into()),
            ..Default::default()
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut query, &filter);

        let sql = query.sql();
        assert!(sql.contains("p.name ILIKE"));
        assert!(sql.contains("p.description ILIKE"));
        assert!(sql.contains("array_to_string(p.tags, ' ') ILIKE"));
    }

    #[test]
    fn empty_keyword_adds_no_clause() {
        let filter = ProductFilter {
            keyword: Some(String::new()),
            ..Default::default()
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut query, &filter);
        assert!(!query.sql().contains("ILIKE"));
    }

    #[test]
    fn price_bounds_are_combined_with_and() {
        let filter = ProductFilter {
            price_min: Some(Decimal::new(100, 1)),
            price_max: Some(Decimal::new(500, 1)),
            ..Default::default()
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut query, &filter);

        let sql = query.sql();
        assert!(sql.contains("p.price >="));
        assert!(sql.contains("p.price <="));
    }

    #[test]
    fn sort_clause_only_accepts_known_columns() {
        assert_eq!(sort_clause(Some("price"), Some("asc")), "p.price ASC");
        assert_eq!(sort_clause(Some("rating"), None), "p.rating DESC");
        // Coluna desconhecida cai no padrão, nunca no SQL final.
        assert_eq!(
            sort_clause(Some("password_hash; DROP TABLE users"), Some("asc")),
            "p.created_at DESC"
        );
        assert_eq!(sort_clause(None, None), "p.created_at DESC");
    }
}
