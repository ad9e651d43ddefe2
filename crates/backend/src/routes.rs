use axum::{routing::get, Router};

use crate::api::handlers;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D100 REVENUE DASHBOARDS
        // ========================================
        .route(
            "/api/revenue/families",
            get(handlers::d100_revenue::list_families),
        )
        .route(
            "/api/revenue/:family",
            get(handlers::d100_revenue::get_revenue_dashboard),
        )
        // ========================================
        // D101 FMC DASHBOARDS
        // ========================================
        .route(
            "/api/fmc/line-in-service",
            get(handlers::d101_fmc::get_line_in_service),
        )
        .route(
            "/api/fmc/connect-wifi",
            get(handlers::d101_fmc::get_connect_wifi),
        )
        // ========================================
        // A001 TERRITORY MASTER DATA
        // ========================================
        .route("/api/areas", get(handlers::a001_territory::get_sales_areas))
        .route("/api/areas/fmc", get(handlers::a001_territory::get_fmc_areas))
}
