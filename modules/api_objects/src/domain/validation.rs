use query_core::FieldErrors;

use crate::contract::model::ApiObjectInput;

pub fn validate_input(input: &ApiObjectInput) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(input.name.trim().is_empty(), "name", "Name is required");
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let input = ApiObjectInput {
            name: "  ".into(),
            data: None,
        };
        assert_eq!(validate_input(&input).get("name"), Some("Name is required"));
    }

    #[test]
    fn data_is_optional() {
        let input = ApiObjectInput {
            name: "iPhone 15 Pro".into(),
            data: None,
        };
        assert!(validate_input(&input).is_empty());
    }
}
