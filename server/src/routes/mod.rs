//! HTTP route definitions.

mod auth;
mod categories;
mod health;
mod notifications;
mod orders;
mod products;
mod reviews;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    let api = Router::new()
        .merge(auth::routes())
        .merge(products::routes())
        .merge(categories::routes())
        .merge(orders::routes())
        .merge(reviews::routes())
        .merge(notifications::routes());

    Router::new().merge(health::routes()).nest("/api", api)
}

#[cfg(test)]
mod tests;
