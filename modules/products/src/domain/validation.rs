use std::sync::LazyLock;

use query_core::FieldErrors;
use regex::Regex;
use rust_decimal::Decimal;

use crate::contract::model::{CatalogFields, ProductInput};

static SKU_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9-]{5,20}$").expect("valid SKU pattern"));

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 1000;
const PRICE_INTEGER_DIGITS: u32 = 8;
const PRICE_FRACTION_DIGITS: u32 = 2;

/// Collect every rule violation of `input` into a field → message map.
pub fn validate_input(input: &ProductInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let name_len = input.name.chars().count();
    if input.name.trim().is_empty() {
        errors.add("name", "Product name is required");
    } else {
        errors.check(
            !(NAME_MIN..=NAME_MAX).contains(&name_len),
            "name",
            "Product name must be between 3 and 100 characters",
        );
    }

    if let Some(description) = &input.description {
        errors.check(
            description.chars().count() > DESCRIPTION_MAX,
            "description",
            "Description must not exceed 1000 characters",
        );
    }

    match input.price {
        None => errors.add("price", "Price is required"),
        Some(price) => check_price(price, &mut errors),
    }

    match input.stock {
        None => errors.add("stock", "Stock is required"),
        Some(stock) => errors.check(stock < 0, "stock", "Stock cannot be negative"),
    }

    if let Some(catalog) = &input.catalog {
        check_catalog(catalog, &mut errors);
    }

    errors
}

fn check_price(price: Decimal, errors: &mut FieldErrors) {
    if price < Decimal::new(1, 2) {
        errors.add("price", "Price must be greater than 0");
        return;
    }
    let normalized = price.normalize();
    let integer_digits = normalized.trunc().abs().to_string().trim_start_matches('0').len();
    if normalized.scale() > PRICE_FRACTION_DIGITS
        || integer_digits > PRICE_INTEGER_DIGITS as usize
    {
        errors.add("price", "Price must have at most 8 digits and 2 decimals");
    }
}

fn check_catalog(catalog: &CatalogFields, errors: &mut FieldErrors) {
    if catalog.sku.trim().is_empty() {
        errors.add("sku", "SKU is required in v2");
    } else {
        errors.check(
            !SKU_PATTERN.is_match(&catalog.sku),
            "sku",
            "SKU must be 5-20 characters, uppercase letters, numbers and hyphens only",
        );
    }

    errors.check(
        catalog.category.trim().is_empty(),
        "category",
        "Category is required in v2",
    );

    errors.check(
        catalog.tags.iter().any(|t| t.trim().is_empty()),
        "tags",
        "Tags must not be blank",
    );
}
