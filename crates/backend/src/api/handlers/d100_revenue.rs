use axum::extract::{Path, Query};
use axum::Json;
use contracts::dashboards::d100_revenue::dto::{
    RevenueDashboardQuery, RevenueDashboardResponse, RevenueFamily, RevenueFamilyInfo,
};
use contracts::shared::territory::count_nodes;

use crate::dashboards::d100_revenue::service;
use crate::shared::error::DashboardError;

/// GET /api/revenue/families
pub async fn list_families() -> Json<Vec<RevenueFamilyInfo>> {
    Json(RevenueFamily::ALL.into_iter().map(RevenueFamilyInfo::from).collect())
}

/// GET /api/revenue/:family?date=2025-06-10&branch=AMBON
pub async fn get_revenue_dashboard(
    Path(family): Path<String>,
    Query(query): Query<RevenueDashboardQuery>,
) -> Result<Json<RevenueDashboardResponse>, DashboardError> {
    let family = family
        .parse::<RevenueFamily>()
        .map_err(|e| DashboardError::UnknownFamily(e.0))?;

    tracing::info!(
        "D100 Revenue: {} dashboard requested for {}",
        family,
        query
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "default date".to_string())
    );

    let response = service::get_revenue_dashboard(family, query).await?;
    tracing::info!(
        "D100 Revenue: {} rows folded into {} nodes for {}",
        response.row_count,
        count_nodes(&response.tree),
        response.period.selected_date
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_unknown_family_is_not_found() {
        let result = get_revenue_dashboard(
            Path("byu".to_string()),
            Query(RevenueDashboardQuery::default()),
        )
        .await;

        let err = result.err().unwrap();
        assert!(matches!(err, DashboardError::UnknownFamily(ref f) if f == "byu"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_family_list_covers_all_families() {
        let Json(families) = list_families().await;
        assert_eq!(families.len(), RevenueFamily::ALL.len());
        assert!(families
            .iter()
            .any(|f| f.family == RevenueFamily::RedeemPv && f.default_lag_days == 3));
    }
}
