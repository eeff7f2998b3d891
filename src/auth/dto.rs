use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    users::{dto::UserResponse, repo_types::User},
    validation::{Validate, Violations},
};

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(message: &str, token: String, user: User) -> Self {
        Self {
            message: message.to_string(),
            token,
            user: user.into(),
        }
    }
}

impl Validate for RegisterRequest {
    type Output = Self;

    fn validate(self) -> Result<Self, AppError> {
        let mut v = Violations::new();
        if v.required("email", &self.email) {
            v.email("email", &self.email);
        }
        v.required("password", &self.password);
        v.required("confirmPassword", &self.confirm_password);
        v.finish(self)
    }
}

impl Validate for LoginRequest {
    type Output = Self;

    fn validate(self) -> Result<Self, AppError> {
        let mut v = Violations::new();
        v.required("email", &self.email);
        v.required("password", &self.password);
        v.finish(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_reads_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"alice@x.com","password":"pw1","confirmPassword":"pw1"}"#,
        )
        .unwrap();
        assert_eq!(req.confirm_password, "pw1");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn register_request_reports_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"nope"}"#).unwrap();
        let Err(AppError::Validation(violations)) = req.validate() else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["email", "password", "confirmPassword"]);
    }

    #[test]
    fn login_request_requires_both_fields() {
        let req = LoginRequest {
            email: "alice@x.com".into(),
            password: String::new(),
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }
}
