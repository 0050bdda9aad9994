use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

#[derive(Clone)]
pub struct ModuleCtx {
    db: Option<DatabaseConnection>,
    config_provider: Option<Arc<dyn ConfigProvider>>,
    cancellation_token: CancellationToken,
    module_name: Option<Arc<str>>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            inner: ModuleCtx {
                db: None,
                config_provider: None,
                cancellation_token: token,
                module_name: None,
            },
        }
    }

    pub fn with_db(mut self, db: DatabaseConnection) -> Self {
        self.inner.db = Some(db);
        self
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope context to a specific module name (used by the registry).
    pub fn for_module(&self, name: &str) -> Self {
        let mut scoped = self.clone();
        scoped.module_name = Some(Arc::<str>::from(name));
        scoped
    }

    /// SeaORM connection, when the process was started with a database.
    pub fn db(&self) -> Option<DatabaseConnection> {
        self.db.clone()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    /// Best-effort: deserialize the module's config into `T`, fallback to `T::default()`
    /// if section is missing or invalid.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> T {
        match (&self.module_name, &self.config_provider) {
            (Some(name), Some(p)) => p
                .get_module_config(name)
                .and_then(|v| match serde_json::from_value::<T>(v.clone()) {
                    Ok(cfg) => Some(cfg),
                    Err(e) => {
                        tracing::warn!(module = %name, error = %e, "invalid module config, using defaults");
                        None
                    }
                })
                .unwrap_or_default(),
            _ => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    struct MapProvider(HashMap<String, serde_json::Value>);

    impl ConfigProvider for MapProvider {
        fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
            self.0.get(module_name)
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct PagingCfg {
        default_page_size: u32,
    }

    impl Default for PagingCfg {
        fn default() -> Self {
            Self {
                default_page_size: 10,
            }
        }
    }

    fn ctx(sections: &[(&str, serde_json::Value)]) -> ModuleCtx {
        let map = sections
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        ModuleCtxBuilder::new(CancellationToken::new())
            .with_config_provider(Arc::new(MapProvider(map)))
            .build()
    }

    #[test]
    fn reads_scoped_section() {
        let c = ctx(&[("products", serde_json::json!({"default_page_size": 25}))]);
        let cfg: PagingCfg = c.for_module("products").module_config();
        assert_eq!(cfg.default_page_size, 25);
    }

    #[test]
    fn falls_back_to_default() {
        let c = ctx(&[("products", serde_json::json!({"default_page_size": "many"}))]);
        let broken: PagingCfg = c.for_module("products").module_config();
        let missing: PagingCfg = c.for_module("users").module_config();
        let unscoped: PagingCfg = c.module_config();
        assert_eq!(broken, PagingCfg::default());
        assert_eq!(missing, PagingCfg::default());
        assert_eq!(unscoped, PagingCfg::default());
        assert!(c.db().is_none());
    }
}
