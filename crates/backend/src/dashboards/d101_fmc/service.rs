use contracts::dashboards::d101_fmc::dto::{
    FmcDashboardKind, FmcDashboardQuery, FmcDashboardResponse, FmcMetrics, FmcNode, FmcNodeData,
};
use contracts::shared::period::PeriodContext;
use contracts::shared::territory::TerritoryLevel;

use super::repository::{self, FmcKeyed, FmcRevenueRow, FmcRgbRow, FmcSource};
use crate::shared::config;
use crate::shared::error::DashboardError;
use crate::shared::indicators::compute::compute_fmc_ratios;
use crate::shared::period::{period_context, resolve_selected_date, today};
use crate::shared::territory::{aggregate, merge_counters, CounterSelector, LevelSelector, TerritoryFilter};

/// Region → Branch → WOK → STO over a revenue row
pub fn fmc_levels() -> [LevelSelector<FmcRevenueRow, FmcMetrics>; 4] {
    [
        LevelSelector {
            level: TerritoryLevel::Region,
            key: FmcRevenueRow::region_key,
            metrics: |r| r.metrics_at(TerritoryLevel::Region),
        },
        LevelSelector {
            level: TerritoryLevel::Branch,
            key: FmcRevenueRow::branch_key,
            metrics: |r| r.metrics_at(TerritoryLevel::Branch),
        },
        LevelSelector {
            level: TerritoryLevel::Wok,
            key: FmcRevenueRow::wok_key,
            metrics: |r| r.metrics_at(TerritoryLevel::Wok),
        },
        LevelSelector {
            level: TerritoryLevel::Sto,
            key: FmcRevenueRow::sto_key,
            metrics: |r| r.metrics_at(TerritoryLevel::Sto),
        },
    ]
}

/// Same hierarchy over an RGB row; counters overwrite on every visit
pub fn fmc_counters() -> [CounterSelector<FmcRgbRow, FmcMetrics>; 4] {
    [
        CounterSelector {
            level: TerritoryLevel::Region,
            key: FmcRgbRow::region_key,
            apply: |r, m| m.rgb = r.counters_at(TerritoryLevel::Region),
        },
        CounterSelector {
            level: TerritoryLevel::Branch,
            key: FmcRgbRow::branch_key,
            apply: |r, m| m.rgb = r.counters_at(TerritoryLevel::Branch),
        },
        CounterSelector {
            level: TerritoryLevel::Wok,
            key: FmcRgbRow::wok_key,
            apply: |r, m| m.rgb = r.counters_at(TerritoryLevel::Wok),
        },
        CounterSelector {
            level: TerritoryLevel::Sto,
            key: FmcRgbRow::sto_key,
            apply: |r, m| m.rgb = r.counters_at(TerritoryLevel::Sto),
        },
    ]
}

pub fn fmc_filter(query: &FmcDashboardQuery) -> TerritoryFilter {
    TerritoryFilter::new()
        .with(TerritoryLevel::Region, query.region.as_deref())
        .with(TerritoryLevel::Branch, query.branch.as_deref())
        .with(TerritoryLevel::Wok, query.wok.as_deref())
        .with(TerritoryLevel::Sto, query.sto.as_deref())
}

/// Builds the revenue tree, merges RGB counters into it, then attaches
/// the derived ratios
pub fn build_fmc_tree(
    revenue_rows: &[FmcRevenueRow],
    rgb_rows: &[FmcRgbRow],
    filter: &TerritoryFilter,
    period: &PeriodContext,
) -> Vec<FmcNode> {
    let levels = fmc_levels();
    let counters = fmc_counters();

    let tree = aggregate(filter.apply(revenue_rows, &levels), &levels);
    let rgb_kept = rgb_rows
        .iter()
        .filter(|row| filter.matches_counters(*row, &counters));
    let tree = merge_counters(tree, rgb_kept, &counters);

    tree.into_iter()
        .map(|node| {
            node.map_metrics(&|base: FmcMetrics| FmcNodeData {
                derived: compute_fmc_ratios(&base, period),
                base,
            })
        })
        .collect()
}

pub async fn get_fmc_dashboard(
    kind: FmcDashboardKind,
    query: FmcDashboardQuery,
) -> Result<FmcDashboardResponse, DashboardError> {
    let dashboard = config::dashboard();
    let today = today();
    let selected = resolve_selected_date(query.date, today, dashboard.default_lag_days);
    let period = period_context(selected);

    let source = FmcSource::new(kind, selected, today, &dashboard.fmc_region);
    tracing::debug!(
        "{} dashboard for {} reads snapshot {}",
        kind,
        selected,
        source.snapshot_table
    );

    let (revenue_rows, rgb_rows) = tokio::try_join!(
        repository::fetch_revenue_rows(&source),
        repository::fetch_rgb_rows(&source)
    )?;

    let tree = build_fmc_tree(&revenue_rows, &rgb_rows, &fmc_filter(&query), &period);

    Ok(FmcDashboardResponse {
        kind,
        period,
        snapshot_table: source.snapshot_table,
        tree,
        revenue_row_count: revenue_rows.len(),
        rgb_row_count: rgb_rows.len(),
    })
}
