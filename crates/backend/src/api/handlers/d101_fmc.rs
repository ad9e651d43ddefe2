use axum::extract::Query;
use axum::Json;
use contracts::dashboards::d101_fmc::dto::{FmcDashboardKind, FmcDashboardQuery, FmcDashboardResponse};
use contracts::shared::territory::count_nodes;

use crate::dashboards::d101_fmc::service;
use crate::shared::error::DashboardError;

async fn fmc_dashboard(
    kind: FmcDashboardKind,
    query: FmcDashboardQuery,
) -> Result<Json<FmcDashboardResponse>, DashboardError> {
    tracing::info!("D101 FMC: {} dashboard requested", kind);

    let response = service::get_fmc_dashboard(kind, query).await?;
    tracing::info!(
        "D101 FMC: {} revenue rows and {} RGB rows from {} folded into {} nodes",
        response.revenue_row_count,
        response.rgb_row_count,
        response.snapshot_table,
        count_nodes(&response.tree)
    );
    Ok(Json(response))
}

/// GET /api/fmc/line-in-service?date=2025-06-10
pub async fn get_line_in_service(
    Query(query): Query<FmcDashboardQuery>,
) -> Result<Json<FmcDashboardResponse>, DashboardError> {
    fmc_dashboard(FmcDashboardKind::LineInService, query).await
}

/// GET /api/fmc/connect-wifi?date=2025-06-10
pub async fn get_connect_wifi(
    Query(query): Query<FmcDashboardQuery>,
) -> Result<Json<FmcDashboardResponse>, DashboardError> {
    fmc_dashboard(FmcDashboardKind::ConnectWifi, query).await
}
