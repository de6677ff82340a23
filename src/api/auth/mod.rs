pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::auth_config;
pub use service::AuthService;
