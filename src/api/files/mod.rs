pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::files_config;
pub use service::FileService;
