//! Web server module
//!
//! Provides the HTTP interface of the storefront.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
