use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::indicators::{Ratio, RatioIndicator};
use crate::shared::period::PeriodContext;
use crate::shared::territory::TerritoryNode;

/// FMC dashboard variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FmcDashboardKind {
    /// New sales orders that went into service this month
    LineInService,
    /// Whitelisted subscribers of the Connect Wifi programme
    ConnectWifi,
}

impl FmcDashboardKind {
    pub fn slug(&self) -> &'static str {
        match self {
            FmcDashboardKind::LineInService => "line-in-service",
            FmcDashboardKind::ConnectWifi => "connect-wifi",
        }
    }
}

impl fmt::Display for FmcDashboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A counter for the current month and the three months before it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaggedCount {
    pub mtd: i64,
    pub m1: i64,
    pub m2: i64,
    pub m3: i64,
}

impl LaggedCount {
    pub fn as_array(&self) -> [i64; 4] {
        [self.mtd, self.m1, self.m2, self.m3]
    }
}

/// Revenue generating base per service category, set by the second pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbCounters {
    pub rgb_all: LaggedCount,
    pub rgb_voice: LaggedCount,
    pub rgb_digital: LaggedCount,
    pub rgb_data: LaggedCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FmcMetrics {
    pub rev_mtd: f64,
    pub rev_m1: f64,
    pub rev_m2: f64,
    pub rev_m3: f64,
    pub subs: i64,
    pub subs_m1: i64,
    pub subs_m2: i64,
    pub subs_m3: i64,
    pub payload: f64,
    pub payload_m1: f64,
    #[serde(flatten)]
    pub rgb: RgbCounters,
}

impl FmcMetrics {
    pub fn revenue(&self) -> [f64; 4] {
        [self.rev_mtd, self.rev_m1, self.rev_m2, self.rev_m3]
    }

    pub fn subscribers(&self) -> [i64; 4] {
        [self.subs, self.subs_m1, self.subs_m2, self.subs_m3]
    }
}

/// A ratio for the current month and the three months before it
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LaggedRatios {
    pub mtd: Ratio,
    pub m1: Ratio,
    pub m2: Ratio,
    pub m3: Ratio,
}

/// Month-over-month growth of a daily rate, for the last three month pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGrowthChain {
    /// MTD vs M-1
    pub mom_daily: RatioIndicator,
    /// M-1 vs M-2
    pub mom_daily_1: RatioIndicator,
    /// M-2 vs M-3
    pub mom_daily_2: RatioIndicator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FmcDerivedMetrics {
    pub daily_rate: LaggedRatios,
    pub revenue_daily_growth: DailyGrowthChain,
    pub arpu: LaggedRatios,
    pub arpu_daily_growth: DailyGrowthChain,
    pub rgb_all_daily_growth: DailyGrowthChain,
    pub rgb_voice_daily_growth: DailyGrowthChain,
    pub rgb_digital_daily_growth: DailyGrowthChain,
    pub rgb_data_daily_growth: DailyGrowthChain,
    pub payload_growth: RatioIndicator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FmcNodeData {
    #[serde(flatten)]
    pub base: FmcMetrics,
    pub derived: FmcDerivedMetrics,
}

pub type FmcNode = TerritoryNode<FmcNodeData>;

/// Query string of the FMC endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FmcDashboardQuery {
    pub date: Option<NaiveDate>,
    pub region: Option<String>,
    pub branch: Option<String>,
    pub wok: Option<String>,
    pub sto: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FmcDashboardResponse {
    pub kind: FmcDashboardKind,
    pub period: PeriodContext,
    /// Subscriber snapshot the query joined, e.g. "v_cb_multidim_20250131"
    pub snapshot_table: String,
    pub tree: Vec<FmcNode>,
    pub revenue_row_count: usize,
    pub rgb_row_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::indicators::IndicatorStatus;
    use crate::shared::territory::TerritoryLevel;

    fn indicator(value: Ratio) -> RatioIndicator {
        let (display, status) = match value {
            Ratio::Value(_) => ("10,00%", IndicatorStatus::Good),
            Ratio::NotAvailable => ("N/A", IndicatorStatus::Neutral),
        };
        RatioIndicator {
            value,
            display: display.to_string(),
            status,
        }
    }

    fn chain(value: Ratio) -> DailyGrowthChain {
        DailyGrowthChain {
            mom_daily: indicator(value),
            mom_daily_1: indicator(Ratio::NotAvailable),
            mom_daily_2: indicator(value),
        }
    }

    fn node_data(rev_mtd: f64, rgb_all_mtd: i64) -> FmcNodeData {
        let mut base = FmcMetrics {
            rev_mtd,
            subs: 4,
            payload: 1.5,
            ..Default::default()
        };
        base.rgb.rgb_all.mtd = rgb_all_mtd;
        base.rgb.rgb_voice.m3 = 2;

        FmcNodeData {
            base,
            derived: FmcDerivedMetrics {
                daily_rate: LaggedRatios {
                    mtd: Ratio::Value(12.5),
                    ..Default::default()
                },
                revenue_daily_growth: chain(Ratio::Value(0.1)),
                arpu: LaggedRatios::default(),
                arpu_daily_growth: chain(Ratio::NotAvailable),
                rgb_all_daily_growth: chain(Ratio::Value(0.1)),
                rgb_voice_daily_growth: chain(Ratio::NotAvailable),
                rgb_digital_daily_growth: chain(Ratio::NotAvailable),
                rgb_data_daily_growth: chain(Ratio::NotAvailable),
                payload_growth: indicator(Ratio::NotAvailable),
            },
        }
    }

    #[test]
    fn test_response_round_trips_through_json() {
        let mut wok = TerritoryNode::leaf("AMBON INNER", TerritoryLevel::Wok, node_data(300.0, 7));
        wok.children
            .push(TerritoryNode::leaf("PAO", TerritoryLevel::Sto, node_data(100.0, 5)));
        let mut branch = TerritoryNode::leaf("AMBON", TerritoryLevel::Branch, node_data(300.0, 7));
        branch.children.push(wok);
        let mut region =
            TerritoryNode::leaf("MALUKU DAN PAPUA", TerritoryLevel::Region, node_data(900.0, 20));
        region.children.push(branch);

        let response = FmcDashboardResponse {
            kind: FmcDashboardKind::LineInService,
            period: PeriodContext {
                selected_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
                day_of_month: 10,
                days_in_month: 30,
                days_in_previous_month: 31,
                days_in_month_minus_2: 30,
                days_in_month_minus_3: 31,
            },
            snapshot_table: "v_cb_multidim_20250610".to_string(),
            tree: vec![region],
            revenue_row_count: 1,
            rgb_row_count: 1,
        };

        let json = serde_json::to_string(&response).unwrap();
        let back: FmcDashboardResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, response);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let sto = &value["tree"][0]["children"][0]["children"][0]["children"][0];
        assert_eq!(sto["name"], "PAO");
        assert_eq!(sto["rgb_all"]["mtd"], 5);
        assert!(sto.get("children").is_none());
    }

    #[test]
    fn test_rgb_counters_flatten_into_metrics() {
        let mut metrics = FmcMetrics::default();
        metrics.rgb.rgb_data.m2 = 7;

        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["rgb_data"]["m2"], 7);
        assert_eq!(json["rev_mtd"], 0.0);
        assert!(json.get("rgb").is_none());
    }

    #[test]
    fn test_lagged_ratios_default_to_not_available() {
        let json = serde_json::to_value(LaggedRatios::default()).unwrap();
        assert_eq!(json["mtd"], "N/A");
        assert_eq!(json["m3"], "N/A");
    }
}
