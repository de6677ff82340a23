pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::alumni_config;
pub use service::AlumniService;
