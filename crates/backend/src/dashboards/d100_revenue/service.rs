use contracts::dashboards::d100_revenue::dto::{
    BaseMetrics, RevenueDashboardQuery, RevenueDashboardResponse, RevenueFamily, RevenueNode,
    RevenueNodeData,
};
use contracts::shared::period::PeriodContext;
use contracts::shared::territory::TerritoryLevel;

use super::repository::{self, RevenueRow};
use crate::shared::error::DashboardError;
use crate::shared::indicators::compute::compute_ratios;
use crate::shared::period::{period_context, resolve_selected_date, today};
use crate::shared::territory::{aggregate, LevelSelector, TerritoryFilter};

/// Region → Branch → Subbranch → Cluster → Kabupaten over a `summary_*` row
pub fn revenue_levels() -> [LevelSelector<RevenueRow, BaseMetrics>; 5] {
    [
        LevelSelector {
            level: TerritoryLevel::Region,
            key: RevenueRow::region_key,
            metrics: |r| r.metrics_at(TerritoryLevel::Region),
        },
        LevelSelector {
            level: TerritoryLevel::Branch,
            key: RevenueRow::branch_key,
            metrics: |r| r.metrics_at(TerritoryLevel::Branch),
        },
        LevelSelector {
            level: TerritoryLevel::Subbranch,
            key: RevenueRow::subbranch_key,
            metrics: |r| r.metrics_at(TerritoryLevel::Subbranch),
        },
        LevelSelector {
            level: TerritoryLevel::Cluster,
            key: RevenueRow::cluster_key,
            metrics: |r| r.metrics_at(TerritoryLevel::Cluster),
        },
        LevelSelector {
            level: TerritoryLevel::Kabupaten,
            key: RevenueRow::kabupaten_key,
            metrics: |r| r.metrics_at(TerritoryLevel::Kabupaten),
        },
    ]
}

pub fn revenue_filter(query: &RevenueDashboardQuery) -> TerritoryFilter {
    TerritoryFilter::new()
        .with(TerritoryLevel::Region, query.region.as_deref())
        .with(TerritoryLevel::Branch, query.branch.as_deref())
        .with(TerritoryLevel::Subbranch, query.subbranch.as_deref())
        .with(TerritoryLevel::Cluster, query.cluster.as_deref())
        .with(TerritoryLevel::Kabupaten, query.kabupaten.as_deref())
}

/// Folds rows into the revenue tree and attaches derived ratios
pub fn build_revenue_tree(
    rows: &[RevenueRow],
    filter: &TerritoryFilter,
    period: &PeriodContext,
) -> Vec<RevenueNode> {
    let levels = revenue_levels();
    let kept = filter.apply(rows, &levels);

    aggregate(kept, &levels)
        .into_iter()
        .map(|node| {
            node.map_metrics(&|base: BaseMetrics| RevenueNodeData {
                derived: compute_ratios(&base, period),
                base,
            })
        })
        .collect()
}

pub async fn get_revenue_dashboard(
    family: RevenueFamily,
    query: RevenueDashboardQuery,
) -> Result<RevenueDashboardResponse, DashboardError> {
    let selected = resolve_selected_date(query.date, today(), family.default_lag_days());
    let period = period_context(selected);

    let rows = repository::fetch_revenue_rows(family, selected).await?;
    let tree = build_revenue_tree(&rows, &revenue_filter(&query), &period);

    Ok(RevenueDashboardResponse {
        family,
        period,
        tree,
        row_count: rows.len(),
    })
}
