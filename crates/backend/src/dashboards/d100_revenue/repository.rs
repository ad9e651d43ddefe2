use chrono::NaiveDate;
use contracts::dashboards::d100_revenue::dto::{BaseMetrics, RevenueFamily};
use contracts::shared::territory::{TerritoryLevel, REVENUE_HIERARCHY};
use sea_orm::{FromQueryResult, Statement};

use crate::shared::data::warehouse::{get_connection, BACKEND};
use crate::shared::error::DashboardError;

/// One kabupaten row of a `summary_*` view. Every level carries its own
/// pre-aggregated columns, repeated on all rows below that level.
#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct RevenueRow {
    pub region: Option<String>,
    pub branch: Option<String>,
    pub subbranch: Option<String>,
    pub cluster: Option<String>,
    pub kabupaten: Option<String>,

    pub current_month_kabupaten_revenue: Option<f64>,
    pub current_month_cluster_revenue: Option<f64>,
    pub current_month_subbranch_revenue: Option<f64>,
    pub current_month_branch_revenue: Option<f64>,
    pub current_month_region_revenue: Option<f64>,

    pub previous_month_kabupaten_revenue: Option<f64>,
    pub previous_month_cluster_revenue: Option<f64>,
    pub previous_month_subbranch_revenue: Option<f64>,
    pub previous_month_branch_revenue: Option<f64>,
    pub previous_month_region_revenue: Option<f64>,

    pub previous_year_same_month_kabupaten_revenue: Option<f64>,
    pub previous_year_same_month_cluster_revenue: Option<f64>,
    pub previous_year_same_month_subbranch_revenue: Option<f64>,
    pub previous_year_same_month_branch_revenue: Option<f64>,
    pub previous_year_same_month_region_revenue: Option<f64>,

    pub kabupaten_target_revenue: Option<f64>,
    pub cluster_target_revenue: Option<f64>,
    pub subbranch_target_revenue: Option<f64>,
    pub branch_target_revenue: Option<f64>,
    pub regional_target_revenue: Option<f64>,

    pub ytd_kabupaten_revenue: Option<f64>,
    pub ytd_cluster_revenue: Option<f64>,
    pub ytd_subbranch_revenue: Option<f64>,
    pub ytd_branch_revenue: Option<f64>,
    pub ytd_regional_revenue: Option<f64>,

    pub prev_ytd_kabupaten_revenue: Option<f64>,
    pub prev_ytd_cluster_revenue: Option<f64>,
    pub prev_ytd_subbranch_revenue: Option<f64>,
    pub prev_ytd_branch_revenue: Option<f64>,
    pub prev_ytd_regional_revenue: Option<f64>,
}

impl RevenueRow {
    pub fn region_key(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn branch_key(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn subbranch_key(&self) -> Option<&str> {
        self.subbranch.as_deref()
    }

    pub fn cluster_key(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    pub fn kabupaten_key(&self) -> Option<&str> {
        self.kabupaten.as_deref()
    }

    /// Level aggregates of the given level, nulls as 0
    pub fn metrics_at(&self, level: TerritoryLevel) -> BaseMetrics {
        let values = match level {
            TerritoryLevel::Region => [
                self.current_month_region_revenue,
                self.regional_target_revenue,
                self.previous_month_region_revenue,
                self.previous_year_same_month_region_revenue,
                self.ytd_regional_revenue,
                self.prev_ytd_regional_revenue,
            ],
            TerritoryLevel::Branch => [
                self.current_month_branch_revenue,
                self.branch_target_revenue,
                self.previous_month_branch_revenue,
                self.previous_year_same_month_branch_revenue,
                self.ytd_branch_revenue,
                self.prev_ytd_branch_revenue,
            ],
            TerritoryLevel::Subbranch => [
                self.current_month_subbranch_revenue,
                self.subbranch_target_revenue,
                self.previous_month_subbranch_revenue,
                self.previous_year_same_month_subbranch_revenue,
                self.ytd_subbranch_revenue,
                self.prev_ytd_subbranch_revenue,
            ],
            TerritoryLevel::Cluster => [
                self.current_month_cluster_revenue,
                self.cluster_target_revenue,
                self.previous_month_cluster_revenue,
                self.previous_year_same_month_cluster_revenue,
                self.ytd_cluster_revenue,
                self.prev_ytd_cluster_revenue,
            ],
            TerritoryLevel::Kabupaten => [
                self.current_month_kabupaten_revenue,
                self.kabupaten_target_revenue,
                self.previous_month_kabupaten_revenue,
                self.previous_year_same_month_kabupaten_revenue,
                self.ytd_kabupaten_revenue,
                self.prev_ytd_kabupaten_revenue,
            ],
            // not part of the revenue hierarchy
            TerritoryLevel::Wok | TerritoryLevel::Sto => [None; 6],
        };

        let [current, target, previous_month, previous_year, ytd, previous_ytd] =
            values.map(Option::unwrap_or_default);

        BaseMetrics {
            current_value: current,
            target_value: target,
            previous_month_value: previous_month,
            previous_year_same_month_value: previous_year,
            year_to_date_value: ytd,
            previous_year_to_date_value: previous_ytd,
        }
    }
}

/// Warehouse view backing a revenue family
pub fn view_name(family: RevenueFamily) -> &'static str {
    match family {
        RevenueFamily::Gross => "summary_revenue_gross",
        RevenueFamily::GrossPrabayar => "summary_revenue_gross_prabayar",
        RevenueFamily::Cvm => "summary_revenue_cvm",
        RevenueFamily::NewSales => "summary_revenue_new_sales",
        RevenueFamily::NewSalesPrabayar => "summary_revenue_new_sales_prabayar",
        RevenueFamily::TrxNewSales => "summary_trx_new_sales",
        RevenueFamily::TrxNewSalesPrabayar => "summary_trx_new_sales_prabayar",
        RevenueFamily::RedeemPv => "summary_revenue_redeem_pv",
    }
}

/// Level name used by the target and YTD columns, which call the region "regional"
fn target_column_level(level: TerritoryLevel) -> &'static str {
    match level {
        TerritoryLevel::Region => "regional",
        level => level.as_str(),
    }
}

pub fn revenue_rows_sql(family: RevenueFamily) -> String {
    let mut columns: Vec<String> = REVENUE_HIERARCHY
        .iter()
        .map(|level| level.as_str().to_string())
        .collect();
    for level in REVENUE_HIERARCHY.iter().rev() {
        let level = level.as_str();
        columns.push(format!("current_month_{level}_revenue"));
        columns.push(format!("previous_month_{level}_revenue"));
        columns.push(format!("previous_year_same_month_{level}_revenue"));
    }
    for level in REVENUE_HIERARCHY.iter().rev() {
        let level = target_column_level(*level);
        columns.push(format!("{level}_target_revenue"));
        columns.push(format!("ytd_{level}_revenue"));
        columns.push(format!("prev_ytd_{level}_revenue"));
    }

    let order_by: Vec<&str> = REVENUE_HIERARCHY.iter().map(|level| level.as_str()).collect();

    format!(
        "SELECT {} FROM v_honai_puma.{} WHERE transaction_date = ? ORDER BY {}",
        columns.join(", "),
        view_name(family),
        order_by.join(", ")
    )
}

/// Rows of one family for one transaction date
pub async fn fetch_revenue_rows(
    family: RevenueFamily,
    date: NaiveDate,
) -> Result<Vec<RevenueRow>, DashboardError> {
    let db = get_connection().await?;

    let sql = revenue_rows_sql(family);
    let stmt = Statement::from_sql_and_values(
        BACKEND,
        &sql,
        [date.format("%Y-%m-%d").to_string().into()],
    );

    let rows = RevenueRow::find_by_statement(stmt).all(db).await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_reads_family_view() {
        let sql = revenue_rows_sql(RevenueFamily::RedeemPv);
        assert!(sql.contains("FROM v_honai_puma.summary_revenue_redeem_pv WHERE transaction_date = ?"));
        assert!(sql.contains("current_month_region_revenue"));
        assert!(sql.contains("regional_target_revenue"));
        assert!(sql.contains("prev_ytd_regional_revenue"));
        assert!(!sql.contains("region_target_revenue"));
        assert!(sql.ends_with("ORDER BY region, branch, subbranch, cluster, kabupaten"));
    }

    #[test]
    fn test_sql_columns_follow_hierarchy() {
        let sql = revenue_rows_sql(RevenueFamily::Gross);
        assert!(sql.starts_with(
            "SELECT region, branch, subbranch, cluster, kabupaten, current_month_kabupaten_revenue, "
        ));
        assert!(sql.contains("kabupaten_target_revenue, ytd_kabupaten_revenue"));

        let select = &sql["SELECT ".len()..sql.find(" FROM").unwrap()];
        // 5 keys, then 6 measures for each of the 5 levels
        assert_eq!(select.split(", ").count(), 35);
    }

    #[test]
    fn test_metrics_at_level_zero_fill() {
        let row = RevenueRow {
            current_month_branch_revenue: Some(120.0),
            branch_target_revenue: Some(100.0),
            previous_month_branch_revenue: None,
            ..Default::default()
        };

        let branch = row.metrics_at(TerritoryLevel::Branch);
        assert_eq!(branch.current_value, 120.0);
        assert_eq!(branch.target_value, 100.0);
        assert_eq!(branch.previous_month_value, 0.0);

        assert_eq!(row.metrics_at(TerritoryLevel::Region), BaseMetrics::default());
    }

    #[test]
    fn test_every_family_has_a_view() {
        for family in RevenueFamily::ALL {
            assert!(view_name(family).starts_with("summary_"));
        }
    }
}
