pub mod cart_repo;
pub use cart_repo::CartRepository;
pub mod category_repo;
pub use category_repo::CategoryRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
