use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use svckit::{DbModule, Module, ModuleCtx, RestfulModule};
use tracing::info;

use crate::api::rest::routes;
use crate::contract::client::ApiObjectsApi;
use crate::domain::repo::ApiObjectsRepository;
use crate::domain::service::Service;
use crate::gateways::local::ApiObjectsLocalClient;
use crate::infra::storage::memory_repo::InMemoryApiObjectsRepository;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmApiObjectsRepository;

pub const MODULE_NAME: &str = "api_objects";

/// Generic named JSON objects; SeaORM-backed when a database is configured.
#[derive(Default)]
pub struct ApiObjects {
    service: ArcSwapOption<Service>,
}

impl ApiObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> Option<Arc<dyn ApiObjectsApi>> {
        self.service
            .load_full()
            .map(|svc| Arc::new(ApiObjectsLocalClient::new(svc)) as Arc<dyn ApiObjectsApi>)
    }
}

#[async_trait]
impl Module for ApiObjects {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing api_objects module");
        let repo: Arc<dyn ApiObjectsRepository> = match ctx.db() {
            Some(conn) => Arc::new(SeaOrmApiObjectsRepository::new(conn)),
            None => {
                info!("No database configured, objects are kept in memory");
                Arc::new(InMemoryApiObjectsRepository::new())
            }
        };
        let service = Service::new(repo);
        self.service.store(Some(Arc::new(service)));
        Ok(())
    }
}

#[async_trait]
impl DbModule for ApiObjects {
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running api_objects database migrations");
        Migrator::up(db, None).await?;
        Ok(())
    }
}

impl RestfulModule for ApiObjects {
    fn register_rest(&self, _ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering api_objects REST routes");
        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        routes::register_routes(router, service)
    }
}
