use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use svckit::{DbModule, Module, ModuleCtx, RestfulModule};
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::ProductsConfig;
use crate::contract::client::ProductsApi;
use crate::domain::repo::ProductsRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::ProductsLocalClient;
use crate::infra::storage::memory_repo::InMemoryProductsRepository;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmProductsRepository;

pub const MODULE_NAME: &str = "products";

/// Product catalog module. Persists through SeaORM when the process has a
/// database, otherwise keeps rows in memory.
#[derive(Default)]
pub struct Products {
    service: ArcSwapOption<Service>,
}

impl Products {
    pub fn new() -> Self {
        Self::default()
    }

    /// In-process client; `None` until `init` has run.
    pub fn client(&self) -> Option<Arc<dyn ProductsApi>> {
        self.service
            .load_full()
            .map(|svc| Arc::new(ProductsLocalClient::new(svc)) as Arc<dyn ProductsApi>)
    }
}

#[async_trait]
impl Module for Products {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing products module");

        let cfg: ProductsConfig = ctx.module_config();
        debug!(
            "Loaded products config: default_page_size={}, max_page_size={}, low_stock_threshold={}",
            cfg.default_page_size, cfg.max_page_size, cfg.low_stock_threshold
        );

        let repo: Arc<dyn ProductsRepository> = match ctx.db() {
            Some(conn) => Arc::new(SeaOrmProductsRepository::new(conn)),
            None => {
                info!("No database configured, products are kept in memory");
                Arc::new(InMemoryProductsRepository::new())
            }
        };
        let service_config = ServiceConfig {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
            low_stock_threshold: cfg.low_stock_threshold,
        };
        self.service
            .store(Some(Arc::new(Service::new(repo, service_config))));
        Ok(())
    }
}

#[async_trait]
impl DbModule for Products {
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running products database migrations");
        Migrator::up(db, None).await?;
        info!("Products database migrations completed successfully");
        Ok(())
    }
}

impl RestfulModule for Products {
    fn register_rest(&self, _ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering products REST routes");

        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;

        let router = routes::register_routes(router, service)?;
        info!("Products REST routes registered successfully");
        Ok(router)
    }
}
