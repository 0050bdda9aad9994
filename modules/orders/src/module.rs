use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use svckit::{DbModule, Module, ModuleCtx, RestfulModule};
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::OrdersConfig;
use crate::contract::client::OrdersApi;
use crate::domain::repo::OrdersRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::OrdersLocalClient;
use crate::infra::storage::memory_repo::InMemoryOrdersRepository;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmOrdersRepository;

pub const MODULE_NAME: &str = "orders";

/// Order management module; SeaORM-backed when a database is configured.
#[derive(Default)]
pub struct Orders {
    service: ArcSwapOption<Service>,
}

impl Orders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> Option<Arc<dyn OrdersApi>> {
        self.service
            .load_full()
            .map(|svc| Arc::new(OrdersLocalClient::new(svc)) as Arc<dyn OrdersApi>)
    }
}

#[async_trait]
impl Module for Orders {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing orders module");
        let cfg: OrdersConfig = ctx.module_config();
        debug!(
            "Loaded orders config: default_page_size={}, max_page_size={}",
            cfg.default_page_size, cfg.max_page_size
        );

        let repo: Arc<dyn OrdersRepository> = match ctx.db() {
            Some(conn) => Arc::new(SeaOrmOrdersRepository::new(conn)),
            None => {
                info!("No database configured, orders are kept in memory");
                Arc::new(InMemoryOrdersRepository::new())
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
impl DbModule for Orders {
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running orders database migrations");
        Migrator::up(db, None).await?;
        Ok(())
    }
}

impl RestfulModule for Orders {
    fn register_rest(&self, _ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering orders REST routes");
        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        routes::register_routes(router, service)
    }
}
