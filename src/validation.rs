use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::AppError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref URL_RE: Regex = Regex::new(
        r"^(?i)https?://(([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}|((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d))(:\d{1,5})?([/?#]\S*)?$"
    )
    .unwrap();
}

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Turns an untrusted request body into a checked domain value.
///
/// Every rule is evaluated so the caller gets the full list of violations
/// at once rather than the first one.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, AppError>;
}

/// Collector used by [`Validate`] implementations.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    /// Records a violation when `value` is blank. Returns whether it was present.
    pub fn required(&mut self, field: &'static str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.push(field, format!("{field} is required"));
            return false;
        }
        true
    }

    pub fn max_len(&mut self, field: &'static str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(field, format!("{field} must be at most {max} characters"));
        }
    }

    pub fn max_len_opt(&mut self, field: &'static str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            self.max_len(field, v, max);
        }
    }

    pub fn url(&mut self, field: &'static str, value: &str) {
        if !URL_RE.is_match(value) {
            self.push(field, format!("{field} must be a valid http(s) URL"));
        }
    }

    pub fn email(&mut self, field: &'static str, value: &str) {
        if !EMAIL_RE.is_match(value) {
            self.push(field, format!("{field} must be a valid email address"));
        }
    }

    /// Parses an enumerated value. Absent or invalid input yields `None`;
    /// invalid input is also recorded.
    pub fn one_of<T>(&mut self, field: &'static str, value: Option<&str>) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match value?.parse::<T>() {
            Ok(v) => Some(v),
            Err(e) => {
                self.push(field, e.to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Yields `value` when nothing was recorded, the violations otherwise.
    pub fn finish<T>(self, value: T) -> Result<T, AppError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}
