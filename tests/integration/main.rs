mod common;

mod auth;
mod user;
