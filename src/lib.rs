pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod status;
pub mod systems;
pub mod users;
pub mod validation;

#[cfg(test)]
mod test_support;
