use std::sync::Arc;

use actix_web::web;

use super::alumni::{alumni_config, AlumniService};
use super::auth::{auth_config, AuthService};
use super::files::{files_config, FileService};
use super::health::health_config;
use super::pekerjaan::{pekerjaan_config, PekerjaanService};
use super::validation;
use crate::auth::TokenService;
use crate::clock::Clock;
use crate::config::Config;
use crate::db::connection::Probe;
use crate::db::Repositories;

/// Everything the handlers pull out of app data, built once and shared by
/// every server worker
#[derive(Clone)]
pub struct AppServices {
    pub tokens: web::Data<TokenService>,
    pub auth: web::Data<AuthService>,
    pub alumni: web::Data<AlumniService>,
    pub pekerjaan: web::Data<PekerjaanService>,
    pub files: web::Data<FileService>,
    pub probe: web::Data<dyn Probe>,
}

impl AppServices {
    pub fn new(config: &Config, repos: Repositories, clock: Arc<dyn Clock>) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.jwt_expiry_hours));
        let timeout = config.request_timeout;
        Self::assemble(
            tokens.clone(),
            AuthService::new(&repos, tokens, clock.clone(), timeout),
            &repos,
            clock,
            timeout,
            config.upload_dir.clone(),
        )
    }

    pub(crate) fn assemble(
        tokens: Arc<TokenService>,
        auth: AuthService,
        repos: &Repositories,
        clock: Arc<dyn Clock>,
        timeout: std::time::Duration,
        upload_dir: std::path::PathBuf,
    ) -> Self {
        Self {
            tokens: web::Data::from(tokens),
            auth: web::Data::new(auth),
            alumni: web::Data::new(AlumniService::new(repos, clock.clone(), timeout)),
            pekerjaan: web::Data::new(PekerjaanService::new(repos, clock.clone(), timeout)),
            files: web::Data::new(FileService::new(repos, clock, timeout, upload_dir)),
            probe: web::Data::from(repos.probe.clone()),
        }
    }

    /// Register the services, the JSON error handler and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.tokens.clone())
            .app_data(self.auth.clone())
            .app_data(self.alumni.clone())
            .app_data(self.pekerjaan.clone())
            .app_data(self.files.clone())
            .app_data(self.probe.clone())
            .app_data(validation::json_config())
            .configure(health_config)
            .service(
                web::scope("/api")
                    .configure(auth_config)
                    .configure(alumni_config)
                    .configure(pekerjaan_config)
                    .configure(files_config),
            );
    }
}
