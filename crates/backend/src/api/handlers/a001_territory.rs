use axum::extract::Query;
use axum::Json;
use contracts::domain::a001_territory::aggregate::{AreaQuery, AreaTreeResponse};

use crate::domain::a001_territory::service;
use crate::shared::error::DashboardError;

/// GET /api/areas
pub async fn get_sales_areas(
    Query(query): Query<AreaQuery>,
) -> Result<Json<AreaTreeResponse>, DashboardError> {
    let response = service::get_sales_areas(query).await?;
    tracing::info!("A001 Territory: returning {} sales area nodes", response.node_count);
    Ok(Json(response))
}

/// GET /api/areas/fmc
pub async fn get_fmc_areas(
    Query(query): Query<AreaQuery>,
) -> Result<Json<AreaTreeResponse>, DashboardError> {
    let response = service::get_fmc_areas(query).await?;
    tracing::info!("A001 Territory: returning {} FMC area nodes", response.node_count);
    Ok(Json(response))
}
