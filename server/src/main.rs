//! Emporium Server - REST API for an e-commerce catalog.
//!
//! Every list endpoint runs through the emporium-engine list-query pipeline
//! (filter, sort, paginate) and answers with a Laravel-compatible envelope.
//! Storage is in-memory unless `DATABASE_URL` points at PostgreSQL.

mod auth;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod seed;
mod store;

use crate::auth::{Authenticator, JwtAuthenticator};
use crate::config::Config;
use crate::models::{Category, Entity, Notification, Order, Product, Review, User};
use crate::store::{MemoryRepository, PgRepository, Pool, Repository};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub authenticator: Arc<dyn Authenticator>,
    pub users: Arc<dyn Repository<User>>,
    pub categories: Arc<dyn Repository<Category>>,
    pub products: Arc<dyn Repository<Product>>,
    pub orders: Arc<dyn Repository<Order>>,
    pub reviews: Arc<dyn Repository<Review>>,
    pub notifications: Arc<dyn Repository<Notification>>,
}

impl AppState {
    fn with_repositories(config: Config, factory: RepoFactory) -> Self {
        let authenticator = Arc::new(JwtAuthenticator::new(
            &config.jwt_secret,
            config.jwt_ttl_secs,
        ));

        Self {
            config: Arc::new(config),
            authenticator,
            users: factory.build(),
            categories: factory.build(),
            products: factory.build(),
            orders: factory.build(),
            reviews: factory.build(),
            notifications: factory.build(),
        }
    }

    /// State backed by in-memory repositories.
    pub fn in_memory(config: Config) -> Self {
        Self::with_repositories(config, RepoFactory::Memory)
    }

    /// State backed by PostgreSQL.
    pub fn postgres(config: Config, pool: Pool) -> Self {
        Self::with_repositories(config, RepoFactory::Postgres(pool))
    }
}

/// Where repositories keep their records.
enum RepoFactory {
    Memory,
    Postgres(Pool),
}

impl RepoFactory {
    fn build<T: Entity>(&self) -> Arc<dyn Repository<T>> {
        match self {
            RepoFactory::Memory => MemoryRepository::<T>::new_shared(),
            RepoFactory::Postgres(pool) => Arc::new(PgRepository::<T>::new(pool.clone())),
        }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emporium_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Emporium API on {}:{}", config.host, config.port);
    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set, signing tokens with the development secret");
    }

    let addr = format!("{}:{}", config.host, config.port);

    // Build application state
    let state = match config.database_url.clone() {
        Some(url) => {
            let pool = store::create_pool(&url).await?;

            tracing::info!("Running database migrations...");
            store::run_migrations(&pool).await?;

            AppState::postgres(config, pool)
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory storage");
            AppState::in_memory(config)
        }
    };

    seed::seed(&state).await?;

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
