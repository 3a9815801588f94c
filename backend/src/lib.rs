//! # Planner Backend
//!
//! Recurring financial planning: definitions with a default value (plain or
//! formula), per-month recorded values with a paid flag, and monthly and
//! yearly totals split into owed and pending.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (axum REST, DTO mappers)
//!     ↓
//! Domain Layer (formula evaluator, catalog, override store, aggregation, service)
//!     ↓
//! Storage Layer (CSV files, in-memory)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::config::BackendConfig;
use crate::domain::PlanningService;
use crate::io::rest::{formula_apis, month_apis, override_apis, planning_apis, year_apis};
use crate::storage::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub planning_service: PlanningService<CsvConnection>,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &BackendConfig) -> Result<AppState> {
    info!("Setting up CSV storage in {}", config.data_directory.display());
    let connection = CsvConnection::new(&config.data_directory)?;

    info!("Setting up domain model (override retention: {})", config.override_retention);
    let planning_service = PlanningService::new(&connection, config.override_retention);

    Ok(AppState { planning_service })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/planning", planning_apis::router())
        .nest("/months", month_apis::router())
        .nest("/overrides", override_apis::router())
        .nest("/years", year_apis::router())
        .nest("/formula", formula_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}
