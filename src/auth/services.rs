use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, RegisterRequest},
    jwt::TokenService,
};
use crate::{error::AppError, users::services::UserDirectory, validation::Validate};

/// Registration and login on top of the user directory.
#[derive(Clone)]
pub struct AuthService {
    users: UserDirectory,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(users: UserDirectory, tokens: Arc<dyn TokenService>) -> Self {
        Self { users, tokens }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        let req = req.validate()?;

        if req.password != req.confirm_password {
            warn!("passwords do not match");
            return Err(AppError::unauthorized("passwords do not match"));
        }

        let user = self.users.create(&req.email, &req.password).await?;
        let token = self.tokens.sign(user.id)?;

        info!(user_id = user.id, "user registered");
        Ok(AuthResponse::new("registration succeeded", token, user))
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let req = req.validate()?;

        // Unknown email and wrong password share one error.
        let Some(user) = self
            .users
            .validate_credentials(&req.email, &req.password)
            .await?
        else {
            warn!("login rejected");
            return Err(AppError::unauthorized("invalid credentials"));
        };

        let token = self.tokens.sign(user.id)?;

        info!(user_id = user.id, "user logged in");
        Ok(AuthResponse::new("login succeeded", token, user))
    }
}
