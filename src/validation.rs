use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails are compared in their trimmed, lower-cased form everywhere.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Collects every failing field before rejecting the request.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn required(&mut self, value: &str, field: &str, message: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, message)
    }

    /// Length in characters of the trimmed value, both bounds inclusive.
    pub fn length(&mut self, value: &str, min: usize, max: usize, field: &str, message: &str) -> &mut Self {
        let len = value.trim().chars().count();
        self.check((min..=max).contains(&len), field, message)
    }

    pub fn email(&mut self, value: &str, field: &str) -> &mut Self {
        self.check(is_valid_email(value), field, "Invalid email")
    }

    pub fn finish(&mut self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation {
                message: "Validation failed".into(),
                errors: std::mem::take(&mut self.errors),
            })
        }
    }
}

/// Accepts `42`, `42.5` or `"42.5"`; rejects NaN and anything outside [0, 100].
pub fn parse_percentage(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && (0.0..=100.0).contains(&n)).then_some(n)
}
