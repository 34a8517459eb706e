// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_profile,
        handlers::auth::update_profile,
        handlers::auth::add_address,
        handlers::auth::update_address,
        handlers::auth::delete_address,

        // --- Catálogo ---
        handlers::products::list_products,
        handlers::products::get_top_products,
        handlers::products::get_featured_products,
        handlers::products::get_seller_products,
        handlers::products::get_product_by_id,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::categories::list_categories,

        // --- Carrinho ---
        handlers::cart::get_cart,
        handlers::cart::add_to_cart,
        handlers::cart::update_cart_item,
        handlers::cart::remove_from_cart,
        handlers::cart::clear_cart,

        // --- Admin ---
        handlers::admin::get_users,
        handlers::admin::get_user_by_id,
        handlers::admin::update_user,
        handlers::admin::deactivate_user,
        handlers::admin::get_pending_sellers,
        handlers::admin::approve_seller,
        handlers::admin::get_dashboard_stats,
        handlers::admin::create_category,
        handlers::admin::update_category,
        handlers::admin::delete_category,
        handlers::admin::feature_product,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::RegisterRole,
            models::auth::BusinessAddress,
            models::auth::User,
            models::auth::Address,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateProfilePayload,
            models::auth::AddressPayload,
            models::auth::AuthResponse,
            models::auth::UserPage,
            handlers::auth::ProfileResponse,

            // --- Catálogo ---
            models::product::Dimensions,
            models::product::Weight,
            models::product::Product,
            models::product::ProductView,
            models::product::ProductPage,
            models::category::Category,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,

            // --- Carrinho ---
            models::cart::Cart,
            models::cart::CartLine,
            models::cart::CartView,
            handlers::cart::AddToCartPayload,
            handlers::cart::UpdateCartItemPayload,

            // --- Admin ---
            models::dashboard::Order,
            models::dashboard::RecentOrder,
            models::dashboard::DashboardStats,
            handlers::admin::AdminUpdateUserPayload,
            handlers::admin::ApproveSellerPayload,
            handlers::admin::FeatureProductPayload,
            handlers::admin::CreateCategoryPayload,
            handlers::admin::UpdateCategoryPayload,
            handlers::admin::SellerSummary,
            handlers::admin::ApproveSellerResponse,

            models::MessageResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, Registro e Perfil"),
        (name = "Products", description = "Catálogo de Produtos Artesanais"),
        (name = "Categories", description = "Categorias do Catálogo"),
        (name = "Cart", description = "Carrinho de Compras"),
        (name = "Admin", description = "Painel Administrativo e Moderação")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
