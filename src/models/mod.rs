pub mod auth;
pub mod snippet;
pub mod user;
