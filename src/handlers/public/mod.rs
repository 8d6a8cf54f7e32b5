// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service info, health, and token acquisition. Everything else lives under
// handlers/protected and runs behind token_auth_middleware.

pub mod auth;
pub mod root;

pub use auth::{login_post, signup_post};
pub use root::{health_get, root_get};
