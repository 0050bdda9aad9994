use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use svckit::{DbModule, Module, ModuleCtx, RestfulModule};
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::UsersConfig;
use crate::contract::client::UsersApi;
use crate::domain::repo::UsersRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::UsersLocalClient;
use crate::infra::storage::memory_repo::InMemoryUsersRepository;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmUsersRepository;

pub const MODULE_NAME: &str = "users";

/// User accounts module; SeaORM-backed when a database is configured.
#[derive(Default)]
pub struct Users {
    service: ArcSwapOption<Service>,
}

impl Users {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> Option<Arc<dyn UsersApi>> {
        self.service
            .load_full()
            .map(|svc| Arc::new(UsersLocalClient::new(svc)) as Arc<dyn UsersApi>)
    }
}

#[async_trait]
impl Module for Users {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing users module");
        let cfg: UsersConfig = ctx.module_config();
        debug!(
            "Loaded users config: default_page_size={}, max_page_size={}",
            cfg.default_page_size, cfg.max_page_size
        );

        let repo: Arc<dyn UsersRepository> = match ctx.db() {
            Some(conn) => Arc::new(SeaOrmUsersRepository::new(conn)),
            None => {
                info!("No database configured, users are kept in memory");
                Arc::new(InMemoryUsersRepository::new())
            }
        };
        let service = Service::new(
            repo,
            ServiceConfig {
                default_page_size: cfg.default_page_size,
                max_page_size: cfg.max_page_size,
            },
        );
        self.service.store(Some(Arc::new(service)));
        Ok(())
    }
}

#[async_trait]
impl DbModule for Users {
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running users database migrations");
        Migrator::up(db, None).await?;
        Ok(())
    }
}

impl RestfulModule for Users {
    fn register_rest(&self, _ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering users REST routes");
        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        routes::register_routes(router, service)
    }
}
