use std::sync::Arc;

use actix_web::web;
use sqlx::PgPool;

use crate::auth::{AuthService, TokenService};
use crate::config::Config;
use crate::routes;
use crate::store::{MemoryStore, PgStore, TaskStore, UserStore};
use crate::tasks::TaskService;
use crate::uploads::AttachmentStorage;

/// Shared application services, cloned into every actix worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: web::Data<AuthService>,
    pub tasks: web::Data<TaskService>,
    pub tokens: web::Data<TokenService>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        tokens: TokenService,
        attachments: AttachmentStorage,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            auth: web::Data::new(AuthService::new(users, tokens.clone(), bcrypt_cost)),
            tasks: web::Data::new(TaskService::new(tasks, attachments)),
            tokens: web::Data::new(tokens),
        }
    }

    /// Production wiring: both stores on the PostgreSQL pool.
    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self::new(
            store.clone(),
            store,
            TokenService::new(&config.jwt_secret, config.jwt_expiration_secs),
            AttachmentStorage::new(&config.upload_dir).with_max_bytes(config.max_upload_bytes),
            config.bcrypt_cost,
        )
    }

    /// Everything in memory; nothing survives the process.
    pub fn in_memory(tokens: TokenService, attachments: AttachmentStorage, bcrypt_cost: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, tokens, attachments, bcrypt_cost)
    }

    /// Registers the services as app data and mounts the routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.tasks.clone())
            .app_data(self.tokens.clone())
            .configure(routes::config);
    }
}
