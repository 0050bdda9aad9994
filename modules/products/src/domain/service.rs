use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::Utc;
use query_core::{
    count_by, count_where, execute, DecimalSummary, FieldErrors, Filter, Page, PageRequest,
    SortDir, SortFields, SortValue, StockCounts,
};
use tracing::{debug, info, instrument};

use crate::contract::model::{
    CatalogFields, Product, ProductInput, ProductQuery, ProductStats, StockStatus,
};
use crate::domain::error::DomainError;
use crate::domain::repo::ProductsRepository;
use crate::domain::validation::validate_input;

const DEFAULT_SORT_FIELD: &str = "name";

/// Domain service with business rules for the product catalog.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ProductsRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    /// Stock levels in `1..low_stock_threshold` count as low stock.
    pub low_stock_threshold: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            low_stock_threshold: 10,
        }
    }
}

fn sort_fields() -> SortFields<Product> {
    SortFields::<Product>::new()
        .field("id", |p| SortValue::Int(p.id))
        .field("name", |p| SortValue::text(&p.name))
        .field("price", |p| SortValue::Decimal(p.price))
        .field("stock", |p| SortValue::Int(p.stock))
        .field("sku", |p| SortValue::opt_text(p.sku.as_deref()))
        .field("category", |p| SortValue::opt_text(p.category.as_deref()))
        .field("createdAt", |p| SortValue::Time(p.created_at))
        .field("updatedAt", |p| SortValue::Time(p.updated_at))
}

fn product_filter(q: &ProductQuery) -> Filter<Product> {
    Filter::<Product>::new()
        .active_only(q.active_only.unwrap_or(true), |p| p.active)
        .contains_ci(q.name.as_deref(), |p| Some(p.name.as_str()))
        .text_eq(q.category.as_deref(), |p| p.category.as_deref())
        .range(q.min_price, q.max_price, |p| p.price)
        .has_tag(q.tag.as_deref(), |p| &p.tags)
        .nonzero(q.in_stock, |p| p.stock)
}

fn tag_set(tags: Vec<String>) -> BTreeSet<String> {
    tags.into_iter().map(|t| t.trim().to_string()).collect()
}

/// `PRD-NNNNN-NNNN`: clock millis mod 100000, then a random 1000..=1999.
pub fn generate_sku() -> String {
    let millis = Utc::now().timestamp_millis().rem_euclid(100_000);
    let suffix = 1000 + (uuid::Uuid::new_v4().as_u128() % 1000) as u32;
    format_sku(millis, suffix)
}

fn format_sku(millis: i64, suffix: u32) -> String {
    format!("PRD-{millis:05}-{suffix:04}")
}

impl Service {
    pub fn new(repo: Arc<dyn ProductsRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn stock_status(&self, product: &Product) -> StockStatus {
        StockStatus::of(product.stock, self.config.low_stock_threshold)
    }

    // --- reads ---

    /// Every stored product, active or not, in insertion order.
    #[instrument(name = "products.service.list_products", skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        debug!("Listing all products");
        Ok(self.repo.scan().await?)
    }

    #[instrument(name = "products.service.get_product", skip(self), fields(product_id = id))]
    pub async fn get_product(&self, id: i64) -> Result<Product, DomainError> {
        debug!("Getting product by id");
        Ok(self.repo.get(id).await?)
    }

    #[instrument(name = "products.service.get_product_by_sku", skip(self))]
    pub async fn get_product_by_sku(&self, sku: &str) -> Result<Product, DomainError> {
        debug!("Getting product by SKU");
        self.repo
            .find_by_sku(sku)
            .await?
            .ok_or_else(|| DomainError::sku_not_found(sku))
    }

    /// Case-insensitive name substring over every stored product.
    #[instrument(name = "products.service.search_by_name", skip(self))]
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, DomainError> {
        let filter = Filter::<Product>::new().contains_ci(Some(name), |p| Some(p.name.as_str()));
        let all = self.repo.scan().await?;
        Ok(all.into_iter().filter(|p| filter.matches(p)).collect())
    }

    /// Filter → sort → page over a snapshot of the catalog.
    #[instrument(name = "products.service.search", skip(self, query))]
    pub async fn search(&self, query: ProductQuery) -> Result<Page<Product>, DomainError> {
        info!("Searching products with {:?}", query);

        let dir = SortDir::parse(query.sort_direction.as_deref().unwrap_or("asc"));
        let field = query
            .sort_by
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SORT_FIELD);
        let order = sort_fields().resolve(field, dir)?;
        let request = PageRequest::new(
            query.page.unwrap_or(0),
            query
                .size
                .unwrap_or(i64::from(self.config.default_page_size)),
        )?
        .clamp_size(u64::from(self.config.max_page_size));

        let filter = product_filter(&query);
        let snapshot = self.repo.scan().await?;
        let page = execute(snapshot, &filter, Some(&order), request);

        debug!(
            total = page.total_elements,
            returned = page.content.len(),
            "Search completed"
        );
        Ok(page)
    }

    /// Distinct sorted categories of active products.
    #[instrument(name = "products.service.categories", skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, DomainError> {
        let all = self.repo.scan().await?;
        let set: BTreeSet<String> = all
            .into_iter()
            .filter(|p| p.active)
            .filter_map(|p| p.category)
            .collect();
        Ok(set.into_iter().collect())
    }

    #[instrument(name = "products.service.statistics", skip(self))]
    pub async fn statistics(&self) -> Result<ProductStats, DomainError> {
        info!("Calculating product statistics");
        let all = self.repo.scan().await?;
        let active_products = count_where(&all, |p| p.active);
        let active: Vec<Product> = all.iter().filter(|p| p.active).cloned().collect();

        let products_by_category = count_by(&active, |p| p.category.clone());
        let prices = DecimalSummary::of(active.iter().map(|p| p.price));
        let stock = StockCounts::of(
            active.iter().map(|p| p.stock),
            self.config.low_stock_threshold,
        );

        Ok(ProductStats {
            total_products: all.len() as u64,
            active_products,
            inactive_products: all.len() as u64 - active_products,
            total_categories: products_by_category.len() as u64,
            products_by_category,
            average_price: prices.average,
            max_price: prices.max,
            min_price: prices.min,
            total_stock: stock.total_units,
            out_of_stock_count: stock.out_of_stock,
            low_stock_count: stock.low_stock,
        })
    }

    // --- writes ---

    #[instrument(
        name = "products.service.create_product",
        skip(self, input),
        fields(name = %input.name)
    )]
    pub async fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        info!("Creating new product");

        validate_input(&input)
            .into_result()
            .map_err(DomainError::validation)?;

        if let Some(catalog) = &input.catalog {
            if self.repo.find_by_sku(&catalog.sku).await?.is_some() {
                return Err(DomainError::sku_already_exists(&catalog.sku));
            }
        }

        let product = self.repo.insert(new_product(input)).await?;
        info!("Successfully created product with id={}", product.id);
        Ok(product)
    }

    /// Replace the editable fields of a product.
    ///
    /// The commit is conditional on `expected_version` when the caller sent
    /// one, otherwise on the version read here.
    #[instrument(
        name = "products.service.update_product",
        skip(self, input),
        fields(product_id = id)
    )]
    pub async fn update_product(
        &self,
        id: i64,
        input: ProductInput,
        expected_version: Option<i64>,
    ) -> Result<Product, DomainError> {
        info!("Updating product");

        validate_input(&input)
            .into_result()
            .map_err(DomainError::validation)?;

        let current = self.repo.get(id).await?;
        let expected = expected_version.unwrap_or(current.version);

        if let Some(catalog) = &input.catalog {
            if current.sku.as_deref() != Some(catalog.sku.as_str()) {
                if let Some(other) = self.repo.find_by_sku(&catalog.sku).await? {
                    if other.id != id {
                        return Err(DomainError::sku_already_exists(&catalog.sku));
                    }
                }
            }
        }

        let next = apply_input(current, input);
        let updated = self
            .repo
            .update_if_version_matches(id, next, expected)
            .await?;
        info!(version = updated.version, "Successfully updated product");
        Ok(updated)
    }

    /// Soft delete: the product stays stored with `active = false`.
    #[instrument(name = "products.service.deactivate_product", skip(self), fields(product_id = id))]
    pub async fn deactivate_product(&self, id: i64) -> Result<(), DomainError> {
        info!("Soft deleting product");
        let current = self.repo.get(id).await?;
        self.repo
            .mark_inactive(id, current.version, Utc::now())
            .await?;
        info!("Product soft deleted");
        Ok(())
    }

    #[instrument(name = "products.service.delete_product", skip(self), fields(product_id = id))]
    pub async fn delete_product(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting product");
        self.repo.delete(id).await?;
        Ok(())
    }

    /// All-or-nothing batch create: the whole batch is checked before any
    /// product is stored.
    #[instrument(
        name = "products.service.bulk_create",
        skip(self, inputs),
        fields(count = inputs.len())
    )]
    pub async fn bulk_create(&self, inputs: Vec<ProductInput>) -> Result<Vec<Product>, DomainError> {
        info!("Bulk creating products");

        if inputs.is_empty() {
            return Err(DomainError::validation(FieldErrors::single(
                "products",
                "At least one product is required",
            )));
        }

        let mut errors = FieldErrors::new();
        for (i, input) in inputs.iter().enumerate() {
            errors.merge_prefixed(&format!("products[{i}]."), validate_input(input));
        }
        errors.into_result().map_err(DomainError::validation)?;

        let mut seen = HashSet::new();
        for sku in inputs
            .iter()
            .filter_map(|i| i.catalog.as_ref().map(|c| c.sku.as_str()))
        {
            if !seen.insert(sku) || self.repo.find_by_sku(sku).await?.is_some() {
                return Err(DomainError::sku_already_exists(sku));
            }
        }

        let batch = inputs.into_iter().map(new_product).collect();
        let stored = self.repo.insert_all(batch).await?;
        info!("Bulk created {} products", stored.len());
        Ok(stored)
    }
}

fn new_product(input: ProductInput) -> Product {
    let now = Utc::now();
    let (sku, category, tags) = match input.catalog {
        Some(CatalogFields {
            sku,
            category,
            tags,
        }) => (Some(sku), Some(category), tag_set(tags)),
        None => (None, None, BTreeSet::new()),
    };
    Product {
        id: 0,
        name: input.name,
        description: input.description,
        price: input.price.unwrap_or_default(),
        stock: input.stock.unwrap_or_default(),
        sku,
        category,
        tags,
        active: true,
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

fn apply_input(mut current: Product, input: ProductInput) -> Product {
    current.name = input.name;
    current.description = input.description;
    if let Some(price) = input.price {
        current.price = price;
    }
    if let Some(stock) = input.stock {
        current.stock = stock;
    }
    if let Some(catalog) = input.catalog {
        current.sku = Some(catalog.sku);
        current.category = Some(catalog.category);
        current.tags = tag_set(catalog.tags);
    }
    current.updated_at = Utc::now();
    current
}
