use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::context::ModuleCtx;
use crate::contracts::{DbModule, Module, RestfulModule};

/// One module and the optional phases it takes part in.
pub struct ModuleEntry {
    name: &'static str,
    core: Arc<dyn Module>,
    db: Option<Arc<dyn DbModule>>,
    rest: Option<Arc<dyn RestfulModule>>,
}

impl ModuleEntry {
    pub fn new(name: &'static str, core: Arc<dyn Module>) -> Self {
        Self {
            name,
            core,
            db: None,
            rest: None,
        }
    }

    pub fn with_db(mut self, db: Arc<dyn DbModule>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_rest(mut self, rest: Arc<dyn RestfulModule>) -> Self {
        self.rest = Some(rest);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Ordered module list; phases run in registration order.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: Vec<ModuleEntry>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, entry: ModuleEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    /// init → migrate (when a database is present) → REST registration.
    pub async fn run_phases(&self, ctx: &ModuleCtx, mut router: Router) -> anyhow::Result<Router> {
        for e in &self.entries {
            info!(module = e.name, "init");
            e.core.init(&ctx.for_module(e.name)).await?;
        }

        if let Some(db) = ctx.db() {
            for e in &self.entries {
                if let Some(m) = &e.db {
                    info!(module = e.name, "migrate");
                    m.migrate(&db).await?;
                }
            }
        }

        for e in &self.entries {
            if let Some(m) = &e.rest {
                info!(module = e.name, "register REST routes");
                router = m.register_rest(&ctx.for_module(e.name), router)?;
            }
        }
        Ok(router)
    }
}
