//! API routes for the SafeRoute server.

pub mod hazards;
pub mod incidents;
pub mod planning;
pub mod police;
mod routes;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}

#[cfg(test)]
mod tests;
