pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::pekerjaan_config;
pub use service::PekerjaanService;
