//! Application wiring shared by `main` and the integration tests.

use actix_web::web;
use sqlx::SqlitePool;

use crate::auth::{AuthMiddleware, CredentialCodec, TokenService};
use crate::config::AuthSettings;
use crate::routes::{self, health};

/// Everything a worker needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub codec: CredentialCodec,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(pool: SqlitePool, settings: &AuthSettings) -> Self {
        Self {
            pool,
            codec: CredentialCodec::new(settings),
            tokens: TokenService::new(settings),
        }
    }

    /// Registers app data, the public endpoints and the token-protected `/api` scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.pool.clone()))
            .app_data(web::Data::new(self.codec.clone()))
            .app_data(web::Data::new(self.tokens.clone()))
            .service(health::root)
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            );
    }
}
