// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        CartRepository, CategoryRepository, DashboardRepository, ProductRepository,
        UserRepository,
    },
    services::{
        admin_service::AdminService, auth_service::AuthService, cart_service::CartService,
        product_service::ProductService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub cart_service: CartService,
    pub admin_service: AdminService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let category_repo = CategoryRepository::new(db_pool.clone());
        let cart_repo = CartRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret, db_pool.clone());
        let product_service = ProductService::new(product_repo.clone(), category_repo.clone());
        let cart_service =
            CartService::new(cart_repo, product_repo.clone(), db_pool.clone());
        let admin_service =
            AdminService::new(user_repo, product_repo, category_repo, dashboard_repo);

        Ok(Self {
            db_pool,
            auth_service,
            product_service,
            cart_service,
            admin_service,
        })
    }
}

// Porta de escuta, também externa à aplicação.
pub fn server_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000)
}
