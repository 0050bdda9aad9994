use std::sync::LazyLock;

use query_core::FieldErrors;
use regex::Regex;

use crate::contract::model::{AccessFields, Role, UserInput, UserStatus};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
});

const USERNAME_MAX: usize = 50;
const EMAIL_MAX: usize = 100;
const NAME_MAX: usize = 50;
const PHONE_MAX: usize = 20;

pub const ROLE_MESSAGE: &str = "Role must be USER, ADMIN, or MANAGER";
pub const STATUS_MESSAGE: &str = "Status must be ACTIVE, INACTIVE, or SUSPENDED";

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

fn required(errors: &mut FieldErrors, value: &str, field: &str, label: &str, max: usize) {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required"));
    } else {
        errors.check(
            too_long(value, max),
            field,
            format!("{label} cannot exceed {max} characters"),
        );
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Collect every rule violation of `input` into a field → message map.
pub fn validate_input(input: &UserInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    required(&mut errors, &input.username, "username", "Username", USERNAME_MAX);

    if input.email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(&input.email) {
        errors.add("email", "Email should be valid");
    } else {
        errors.check(
            too_long(&input.email, EMAIL_MAX),
            "email",
            "Email cannot exceed 100 characters",
        );
    }

    required(&mut errors, &input.first_name, "firstName", "First name", NAME_MAX);
    required(&mut errors, &input.last_name, "lastName", "Last name", NAME_MAX);

    if let Some(phone) = &input.phone {
        errors.check(
            too_long(phone, PHONE_MAX),
            "phone",
            "Phone cannot exceed 20 characters",
        );
    }

    if let Some(access) = &input.access {
        check_access(access, &mut errors);
    }

    errors
}

fn check_access(access: &AccessFields, errors: &mut FieldErrors) {
    if let Some(role) = &access.role {
        errors.check(Role::parse(role).is_none(), "role", ROLE_MESSAGE);
    }
    if let Some(status) = &access.status {
        errors.check(UserStatus::parse(status).is_none(), "status", STATUS_MESSAGE);
    }
}
