//! wicket server: OAuth2 login, signed session cookies, and a
//! session-gated user endpoint.

pub mod auth;
pub mod config;
pub mod routes;
pub mod user;

pub use auth::AppState;
pub use routes::router;
