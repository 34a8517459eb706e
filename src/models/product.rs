// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::pagination;

// Filtros do catálogo, vindos direto da query string. Todos opcionais e
// combinados com AND; o predicado is_active = TRUE é sempre aplicado por
// baixo e não pode ser desligado pelo chamador.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Busca (case-insensitive) em nome, descrição e tags
    pub keyword: Option<String>,
    pub category: Option<Uuid>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    /// Nota mínima (0 a 5)
    pub rating: Option<Decimal>,
    pub craft_type: Option<String>,
    pub region: Option<String>,
    /// Página 1-based; fora do intervalo devolve lista vazia
    pub page_number: Option<i64>,
    /// name | price | rating | createdAt
    pub sort_by: Option<String>,
    /// asc | desc
    pub order: Option<String>,
}

// Dimensões físicas da peça (opcional, guardado como JSONB).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(default = "default_dimension_unit")]
    pub unit: String, // "cm" ou "inch"
}

fn default_dimension_unit() -> String {
    "cm".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Weight {
    pub value: Option<f64>,
    #[serde(default = "default_weight_unit")]
    pub unit: String, // "g" ou "kg"
}

fn default_weight_unit() -> String {
    "g".to_string()
}

// Produto como está no banco. `rating` e `num_reviews` são agregados
// mantidos por um subsistema de avaliações externo a este serviço.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub count_in_stock: i32,
    pub rating: Decimal,
    pub num_reviews: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub materials: Vec<String>,
    #[schema(value_type = Option<Dimensions>)]
    pub dimensions: Option<sqlx::types::Json<Dimensions>>,
    #[schema(value_type = Option<Weight>)]
    pub weight: Option<sqlx::types::Json<Weight>>,
    pub tags: Vec<String>,
    pub craft_type: String,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Produto com as referências resolvidas (nome da categoria e do vendedor),
// o formato que o catálogo devolve ao chamador.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub count_in_stock: i32,
    pub rating: Decimal,
    pub num_reviews: i32,
    pub is_featured: bool,
    pub is_active: bool,
    pub materials: Vec<String>,
    #[schema(value_type = Option<Dimensions>)]
    pub dimensions: Option<sqlx::types::Json<Dimensions>>,
    #[schema(value_type = Option<Weight>)]
    pub weight: Option<sqlx::types::Json<Weight>>,
    pub tags: Vec<String>,
    pub craft_type: String,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // LEFT JOIN: a categoria pode ter sido desativada depois
    pub category_name: Option<String>,
    pub seller_name: Option<String>,
}

// Página de catálogo: itens + metadados de paginação
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<ProductView>,
    pub page: i64,
    pub pages: i64,
    pub count: i64,
}

impl ProductPage {
    pub fn new(products: Vec<ProductView>, page: i64, count: i64) -> Self {
        Self {
            products,
            page,
            pages: pagination::total_pages(count),
            count,
        }
    }
}
