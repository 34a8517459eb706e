// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Perfil e endereços (protegidos pelo guard)
    let profile_routes = Router::new()
        .route(
            "/profile",
            get(handlers::auth::get_profile).put(handlers::auth::update_profile),
        )
        .route("/address", post(handlers::auth::add_address))
        .route(
            "/address/{id}",
            put(handlers::auth::update_address).delete(handlers::auth::delete_address),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Catálogo: leitura pública e escrita de vendedor no MESMO caminho; a
    // autenticação das escritas fica nos extratores (AuthenticatedUser + gates),
    // não num layer de router.
    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/top", get(handlers::products::get_top_products))
        .route("/featured", get(handlers::products::get_featured_products))
        .route("/seller", get(handlers::products::get_seller_products))
        .route(
            "/{id}",
            get(handlers::products::get_product_by_id)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let cart_routes = Router::new()
        .route(
            "/",
            get(handlers::cart::get_cart)
                .post(handlers::cart::add_to_cart)
                .delete(handlers::cart::clear_cart),
        )
        .route(
            "/{productId}",
            put(handlers::cart::update_cart_item).delete(handlers::cart::remove_from_cart),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let admin_routes = Router::new()
        .route("/users", get(handlers::admin::get_users))
        .route(
            "/users/{id}",
            get(handlers::admin::get_user_by_id)
                .put(handlers::admin::update_user)
                .delete(handlers::admin::deactivate_user),
        )
        .route("/sellers/pending", get(handlers::admin::get_pending_sellers))
        .route("/sellers/{id}/approve", put(handlers::admin::approve_seller))
        .route("/dashboard", get(handlers::admin::get_dashboard_stats))
        .route("/categories", post(handlers::admin::create_category))
        .route(
            "/categories/{id}",
            put(handlers::admin::update_category).delete(handlers::admin::delete_category),
        )
        .route(
            "/products/{id}/feature",
            put(handlers::admin::feature_product),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/categories", get(handlers::categories::list_categories))
        .nest("/api/auth", auth_routes.merge(profile_routes))
        .nest("/api/products", product_routes)
        .nest("/api/cart", cart_routes)
        .nest("/api/admin", admin_routes)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = format!("0.0.0.0:{}", config::server_port());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!(
        "🚀 Servidor escutando em {}",
        listener.local_addr().expect("endereço local indisponível")
    );
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
