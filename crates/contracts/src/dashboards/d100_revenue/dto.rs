use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::indicators::RatioIndicator;
use crate::shared::period::PeriodContext;
use crate::shared::territory::TerritoryNode;

/// Revenue/transaction view family served by the revenue dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevenueFamily {
    Gross,
    GrossPrabayar,
    Cvm,
    NewSales,
    NewSalesPrabayar,
    TrxNewSales,
    TrxNewSalesPrabayar,
    RedeemPv,
}

impl RevenueFamily {
    pub const ALL: [RevenueFamily; 8] = [
        RevenueFamily::Gross,
        RevenueFamily::GrossPrabayar,
        RevenueFamily::Cvm,
        RevenueFamily::NewSales,
        RevenueFamily::NewSalesPrabayar,
        RevenueFamily::TrxNewSales,
        RevenueFamily::TrxNewSalesPrabayar,
        RevenueFamily::RedeemPv,
    ];

    /// Path segment, e.g. "new-sales-prabayar"
    pub fn slug(&self) -> &'static str {
        match self {
            RevenueFamily::Gross => "gross",
            RevenueFamily::GrossPrabayar => "gross-prabayar",
            RevenueFamily::Cvm => "cvm",
            RevenueFamily::NewSales => "new-sales",
            RevenueFamily::NewSalesPrabayar => "new-sales-prabayar",
            RevenueFamily::TrxNewSales => "trx-new-sales",
            RevenueFamily::TrxNewSalesPrabayar => "trx-new-sales-prabayar",
            RevenueFamily::RedeemPv => "redeem-pv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RevenueFamily::Gross => "Revenue Gross",
            RevenueFamily::GrossPrabayar => "Revenue Gross Prabayar",
            RevenueFamily::Cvm => "Revenue CVM",
            RevenueFamily::NewSales => "Revenue New Sales",
            RevenueFamily::NewSalesPrabayar => "Revenue New Sales Prabayar",
            RevenueFamily::TrxNewSales => "Trx New Sales",
            RevenueFamily::TrxNewSalesPrabayar => "Trx New Sales Prabayar",
            RevenueFamily::RedeemPv => "Revenue Redeem PV",
        }
    }

    /// Days between today and the default "as-of" date.
    /// Redeem PV lands one day later than the other feeds.
    pub fn default_lag_days(&self) -> u32 {
        match self {
            RevenueFamily::RedeemPv => 3,
            _ => 2,
        }
    }

    /// Transaction families count rows instead of summing money
    pub fn is_transaction_count(&self) -> bool {
        matches!(
            self,
            RevenueFamily::TrxNewSales | RevenueFamily::TrxNewSalesPrabayar
        )
    }
}

impl fmt::Display for RevenueFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRevenueFamily(pub String);

impl fmt::Display for UnknownRevenueFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown revenue family: {}", self.0)
    }
}

impl std::error::Error for UnknownRevenueFamily {}

impl FromStr for RevenueFamily {
    type Err = UnknownRevenueFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RevenueFamily::ALL
            .into_iter()
            .find(|family| family.slug() == s)
            .ok_or_else(|| UnknownRevenueFamily(s.to_string()))
    }
}

/// Entry of the family catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueFamilyInfo {
    pub family: RevenueFamily,
    pub label: String,
    pub default_lag_days: u32,
    /// Values are transaction counts rather than rupiah
    pub transaction_count: bool,
}

impl From<RevenueFamily> for RevenueFamilyInfo {
    fn from(family: RevenueFamily) -> Self {
        Self {
            family,
            label: family.label().to_string(),
            default_lag_days: family.default_lag_days(),
            transaction_count: family.is_transaction_count(),
        }
    }
}

/// Level aggregates stored on every revenue node. Missing warehouse values are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseMetrics {
    pub current_value: f64,
    pub target_value: f64,
    pub previous_month_value: f64,
    pub previous_year_same_month_value: f64,
    pub year_to_date_value: f64,
    pub previous_year_to_date_value: f64,
}

/// Display ratios derived from [`BaseMetrics`] and the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub achievement_to_target: RatioIndicator,
    pub achievement_daily_run_rate: RatioIndicator,
    pub month_over_month: RatioIndicator,
    pub year_over_year: RatioIndicator,
    pub year_to_date_growth: RatioIndicator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueNodeData {
    #[serde(flatten)]
    pub base: BaseMetrics,
    pub derived: DerivedMetrics,
}

pub type RevenueNode = TerritoryNode<RevenueNodeData>;

/// Query string of `GET /api/revenue/:family`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueDashboardQuery {
    /// As-of date, defaults to today minus the family lag
    pub date: Option<NaiveDate>,
    pub region: Option<String>,
    pub branch: Option<String>,
    pub subbranch: Option<String>,
    pub cluster: Option<String>,
    pub kabupaten: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueDashboardResponse {
    pub family: RevenueFamily,
    pub period: PeriodContext,
    pub tree: Vec<RevenueNode>,
    /// Rows returned by the warehouse before filtering
    pub row_count: usize,
}
