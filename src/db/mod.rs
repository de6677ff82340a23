pub mod alumni_repository;
pub mod connection;
pub mod file_repository;
pub mod migrations;
pub mod models;
pub mod pekerjaan_repository;
pub mod query;
pub mod user_repository;

#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use alumni_repository::{AlumniRepository, PgAlumniRepository};
use connection::Probe;
use file_repository::{FileRepository, PgFileRepository};
use pekerjaan_repository::{PekerjaanRepository, PgPekerjaanRepository};
use user_repository::{PgUserRepository, UserRepository};

/// Every store the services depend on, behind their traits
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub alumni: Arc<dyn AlumniRepository>,
    pub pekerjaan: Arc<dyn PekerjaanRepository>,
    pub files: Arc<dyn FileRepository>,
    pub probe: Arc<dyn Probe>,
}

impl Repositories {
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            alumni: Arc::new(PgAlumniRepository::new(pool.clone())),
            pekerjaan: Arc::new(PgPekerjaanRepository::new(pool.clone())),
            files: Arc::new(PgFileRepository::new(pool.clone())),
            probe: Arc::new(pool),
        }
    }

    #[cfg(test)]
    pub fn memory(store: Arc<memory::MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            alumni: store.clone(),
            pekerjaan: store.clone(),
            files: store.clone(),
            probe: store,
        }
    }
}
