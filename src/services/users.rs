// ABOUTME: Validation of registration and password change requests
// ABOUTME: Enforces username charset, field lengths, email shape and password length
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cookbook Server Contributors

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::constants::limits::{
    EMAIL_MAX_LENGTH, PASSWORD_MIN_LENGTH, PERSON_NAME_MAX_LENGTH, USERNAME_MAX_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Usernames the router would shadow
const RESERVED_USERNAMES: &[&str] = &["me", "subscriptions", "set_password"];

fn username_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[\w.-]+$").ok())
        .as_ref()
}

/// Registration request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationInput {
    /// Login email
    pub email: Option<String>,
    /// Public handle
    pub username: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

/// Registration data that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    /// Login email
    pub email: String,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Plain-text password, hashed by the caller
    pub password: String,
}

impl RegistrationInput {
    /// Validate every field
    ///
    /// # Errors
    ///
    /// Returns a field-level validation error for the first invalid field
    pub fn validate(self) -> AppResult<ValidatedRegistration> {
        let email = required(self.email, "email")?;
        let username = required(self.username, "username")?;
        let first_name = required(self.first_name, "first_name")?;
        let last_name = required(self.last_name, "last_name")?;
        let password = self
            .password
            .ok_or_else(|| AppError::missing_field("password"))?;

        validate_email(&email)?;
        validate_username(&username)?;
        validate_length(&first_name, "first_name", PERSON_NAME_MAX_LENGTH)?;
        validate_length(&last_name, "last_name", PERSON_NAME_MAX_LENGTH)?;
        validate_password(&password, "password")?;

        Ok(ValidatedRegistration {
            email,
            username,
            first_name,
            last_name,
            password,
        })
    }
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    match value.map(|v| v.trim().to_owned()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::missing_field(field)),
    }
}

fn validate_length(value: &str, field: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(
            AppError::invalid_input(format!("'{field}' must be at most {max} characters"))
                .with_field(field),
        );
    }
    Ok(())
}

/// Minimal email shape check: one `@` with text on both sides and a dotted domain
///
/// # Errors
///
/// Returns a validation error on the `email` field
pub fn validate_email(email: &str) -> AppResult<()> {
    validate_length(email, "email", EMAIL_MAX_LENGTH)?;

    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.split('.').count() >= 2
            && domain.split('.').all(|part| !part.is_empty())
            && !email.chars().any(char::is_whitespace)
    });
    if valid {
        Ok(())
    } else {
        Err(AppError::invalid_format("Enter a valid email address").with_field("email"))
    }
}

/// Usernames allow letters, digits, `.`, `_` and `-`
///
/// # Errors
///
/// Returns a validation error naming the offending characters
pub fn validate_username(username: &str) -> AppResult<()> {
    validate_length(username, "username", USERNAME_MAX_LENGTH)?;

    if RESERVED_USERNAMES.contains(&username) {
        return Err(
            AppError::invalid_input(format!("Username '{username}' is reserved"))
                .with_field("username"),
        );
    }

    let matches = username_pattern()
        .ok_or_else(|| AppError::internal("Username pattern failed to compile"))?
        .is_match(username);
    if matches {
        return Ok(());
    }

    let invalid: BTreeSet<char> = username
        .chars()
        .filter(|c| !c.is_alphanumeric() && !matches!(c, '.' | '_' | '-'))
        .collect();
    Err(AppError::invalid_format(format!(
        "Username contains invalid characters: {}",
        invalid.into_iter().collect::<String>()
    ))
    .with_field("username"))
}

/// Passwords need at least the minimum length and may not be blank
///
/// # Errors
///
/// Returns a validation error on `field`
pub fn validate_password(password: &str, field: &str) -> AppResult<()> {
    if password.trim().is_empty() || password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters"
        ))
        .with_field(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RegistrationInput {
        RegistrationInput {
            email: Some("cook@example.com".to_owned()),
            username: Some("chef.anna_1".to_owned()),
            first_name: Some("Anna".to_owned()),
            last_name: Some("Cook".to_owned()),
            password: Some("long-enough".to_owned()),
        }
    }

    #[test]
    fn test_valid_registration() {
        let registration = input().validate().unwrap();
        assert_eq!(registration.username, "chef.anna_1");
    }

    #[test]
    fn test_username_reports_invalid_characters() {
        let error = validate_username("bad name!").unwrap_err();
        assert_eq!(error.context.field.as_deref(), Some("username"));
        assert!(error.message.ends_with(" !"), "{}", error.message);

        assert!(validate_username("шеф-повар").is_ok());
        assert!(validate_username("me").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("a@b.co").is_ok());
        for bad in ["plain", "@b.co", "a@b", "a@@b.co", "a b@c.de", "a@b..c"] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_missing_and_short_fields() {
        let missing = RegistrationInput {
            last_name: Some("  ".to_owned()),
            ..input()
        };
        assert_eq!(
            missing.validate().unwrap_err().context.field.as_deref(),
            Some("last_name")
        );

        let short = RegistrationInput {
            password: Some("short".to_owned()),
            ..input()
        };
        assert_eq!(
            short.validate().unwrap_err().context.field.as_deref(),
            Some("password")
        );
    }
}
