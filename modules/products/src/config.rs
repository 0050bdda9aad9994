use serde::{Deserialize, Serialize};

/// Configuration for the products module (`modules.products` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductsConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Larger requested sizes are clamped to this.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

impl Default for ProductsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_low_stock_threshold() -> i64 {
    10
}
