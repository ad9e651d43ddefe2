use contracts::domain::a001_territory::aggregate::{AreaInfo, AreaNode, AreaQuery, AreaTreeResponse};
use contracts::shared::territory::{count_nodes, TerritoryLevel};

use super::repository::{self, FmcAreaRow, SalesAreaRow};
use crate::shared::error::DashboardError;
use crate::shared::territory::{LevelSelector, TerritoryFilter, TreeBuilder};

fn area(id: &Option<String>) -> AreaInfo {
    AreaInfo {
        id: id.clone().unwrap_or_default(),
    }
}

pub fn sales_area_levels() -> [LevelSelector<SalesAreaRow, AreaInfo>; 5] {
    [
        LevelSelector {
            level: TerritoryLevel::Region,
            key: SalesAreaRow::region_key,
            metrics: |r| area(&r.region_id),
        },
        LevelSelector {
            level: TerritoryLevel::Branch,
            key: SalesAreaRow::branch_key,
            metrics: |r| area(&r.branch_id),
        },
        LevelSelector {
            level: TerritoryLevel::Subbranch,
            key: SalesAreaRow::subbranch_key,
            metrics: |r| area(&r.subbranch_id),
        },
        LevelSelector {
            level: TerritoryLevel::Cluster,
            key: SalesAreaRow::cluster_key,
            metrics: |r| area(&r.cluster_id),
        },
        LevelSelector {
            level: TerritoryLevel::Kabupaten,
            key: SalesAreaRow::kabupaten_key,
            metrics: |r| area(&r.kabupaten_id),
        },
    ]
}

pub fn fmc_area_levels() -> [LevelSelector<FmcAreaRow, AreaInfo>; 4] {
    [
        LevelSelector {
            level: TerritoryLevel::Region,
            key: FmcAreaRow::region_key,
            metrics: |r| area(&r.region_id),
        },
        LevelSelector {
            level: TerritoryLevel::Branch,
            key: FmcAreaRow::branch_key,
            metrics: |r| area(&r.branch_id),
        },
        LevelSelector {
            level: TerritoryLevel::Wok,
            key: FmcAreaRow::wok_key,
            metrics: |r| area(&r.wok_id),
        },
        LevelSelector {
            level: TerritoryLevel::Sto,
            key: FmcAreaRow::sto_key,
            metrics: |r| area(&r.sto_id),
        },
    ]
}

/// Each row is inserted down to its last present level, so childless
/// territories still appear as nodes.
fn build_area_tree<R>(
    rows: &[R],
    levels: &[LevelSelector<R, AreaInfo>],
    depth: fn(&R) -> usize,
    query: &AreaQuery,
) -> AreaTreeResponse {
    let filter = TerritoryFilter::new().with(TerritoryLevel::Region, query.region.as_deref());

    let mut builder = TreeBuilder::new();
    for row in filter.apply(rows, levels) {
        let present = depth(row).min(levels.len());
        builder.insert_row(row, &levels[..present]);
    }
    let tree: Vec<AreaNode> = builder.build();

    AreaTreeResponse {
        node_count: count_nodes(&tree),
        tree,
    }
}

/// Region → Branch → Subbranch → Cluster → Kabupaten
pub fn build_sales_area_tree(rows: &[SalesAreaRow], query: &AreaQuery) -> AreaTreeResponse {
    build_area_tree(rows, &sales_area_levels(), SalesAreaRow::depth, query)
}

/// Region → Branch → WOK → STO
pub fn build_fmc_area_tree(rows: &[FmcAreaRow], query: &AreaQuery) -> AreaTreeResponse {
    build_area_tree(rows, &fmc_area_levels(), FmcAreaRow::depth, query)
}

pub async fn get_sales_areas(query: AreaQuery) -> Result<AreaTreeResponse, DashboardError> {
    let rows = repository::list_sales_areas().await?;
    Ok(build_sales_area_tree(&rows, &query))
}

pub async fn get_fmc_areas(query: AreaQuery) -> Result<AreaTreeResponse, DashboardError> {
    let rows = repository::list_fmc_areas().await?;
    Ok(build_fmc_area_tree(&rows, &query))
}
