use query_core::FieldErrors;
use rust_decimal::Decimal;

use crate::contract::model::OrderInput;

const SHIPPING_ADDRESS_MAX: usize = 500;
const NOTES_MAX: usize = 1000;

pub const STATUS_MESSAGE: &str =
    "Status must be PENDING, CONFIRMED, SHIPPED, DELIVERED, or CANCELLED";

fn positive_id(errors: &mut FieldErrors, value: Option<i64>, field: &str, label: &str) {
    match value {
        None => errors.add(field, format!("{label} is required")),
        Some(id) => errors.check(id < 1, field, format!("{label} must be positive")),
    }
}

pub fn validate_input(input: &OrderInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    positive_id(&mut errors, input.user_id, "userId", "User ID");
    positive_id(&mut errors, input.product_id, "productId", "Product ID");

    match input.quantity {
        None => errors.add("quantity", "Quantity is required"),
        Some(q) => errors.check(q < 1, "quantity", "Quantity must be at least 1"),
    }

    match input.total_price {
        None => errors.add("totalPrice", "Total price is required"),
        Some(p) => errors.check(
            p < Decimal::new(1, 2),
            "totalPrice",
            "Total price must be greater than 0",
        ),
    }

    if let Some(address) = &input.shipping_address {
        errors.check(
            address.chars().count() > SHIPPING_ADDRESS_MAX,
            "shippingAddress",
            "Shipping address cannot exceed 500 characters",
        );
    }

    if let Some(notes) = input.details.as_ref().and_then(|d| d.notes.as_ref()) {
        errors.check(
            notes.chars().count() > NOTES_MAX,
            "notes",
            "Notes cannot exceed 1000 characters",
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::OrderDetails;

    #[test]
    fn missing_and_out_of_range_values() {
        let errors = validate_input(&OrderInput {
            user_id: None,
            product_id: Some(0),
            quantity: Some(0),
            total_price: Some(Decimal::ZERO),
            shipping_address: Some("a".repeat(501)),
            details: Some(OrderDetails {
                notes: Some("n".repeat(1001)),
            }),
        });
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get("userId"), Some("User ID is required"));
        assert_eq!(errors.get("productId"), Some("Product ID must be positive"));
        assert_eq!(errors.get("quantity"), Some("Quantity must be at least 1"));
    }

    #[test]
    fn minimal_order_is_valid() {
        let errors = validate_input(&OrderInput {
            user_id: Some(1),
            product_id: Some(2),
            quantity: Some(1),
            total_price: Some(Decimal::new(1, 2)),
            ..Default::default()
        });
        assert!(errors.is_empty());
    }
}
