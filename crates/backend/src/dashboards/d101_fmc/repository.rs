use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d101_fmc::dto::{FmcDashboardKind, FmcMetrics, LaggedCount, RgbCounters};
use contracts::shared::territory::{TerritoryLevel, FMC_HIERARCHY};
use sea_orm::{DbErr, FromQueryResult, QueryResult, Statement, Value};

use crate::shared::data::warehouse::{get_connection, BACKEND};
use crate::shared::error::DashboardError;
use crate::shared::period::days_in_month;

// ---------------------------------------------------------------------------
// Table naming
// ---------------------------------------------------------------------------

/// Daily subscriber snapshot joined for the selected date.
///
/// The snapshot of the selected day exists only while its month is still
/// open; closed months are read from their month-end snapshot.
pub fn snapshot_table(selected: NaiveDate, today: NaiveDate) -> String {
    let (year, month) = (selected.year(), selected.month());
    let day = if (year, month) == (today.year(), today.month()) {
        selected.day()
    } else {
        days_in_month(year, month)
    };
    format!("v_cb_multidim_{:04}{:02}{:02}", year, month, day)
}

/// Monthly order table; it is cumulative, so the latest one covers every
/// order month.
pub fn orders_table(today: NaiveDate) -> String {
    format!(
        "ih_ordering_detail_order_new_{:04}{:02}",
        today.year(),
        today.month()
    )
}

/// STO codes of each WOK, for sources that carry no WOK column
pub const STO_WOK_MAP: [(&str, &[&str]); 8] = [
    (
        "AMBON OUTER",
        &["WHA", "TUA", "SPR", "SML", "NML", "NIR", "MSH", "LRA", "DOB", "BUL"],
    ),
    ("AMBON INNER", &["PAO", "ABO"]),
    ("JAYAPURA OUTER", &["WAM", "SRU", "SRM", "SNI", "BIA"]),
    ("JAYAPURA INNER", &["WAE", "JPB", "JAP", "ABE"]),
    ("MIMIKA", &["TIM", "TBG", "KUK", "NAB"]),
    ("MERAUKE", &["TMR", "MRK", "BAD", "AGT"]),
    ("MANOKWARI NABIRE", &["WMR", "RSK", "MWR", "KIN", "FFA", "BTI"]),
    ("SORONG RAJA AMPAT", &["TMB", "SON"]),
];

fn wok_case_sql(sto_column: &str) -> String {
    let mut sql = String::from("CASE");
    for (wok, stos) in STO_WOK_MAP {
        let codes: Vec<String> = stos.iter().map(|s| format!("'{s}'")).collect();
        sql.push_str(&format!(
            " WHEN {} IN ({}) THEN '{}'",
            sto_column,
            codes.join(", "),
            wok
        ));
    }
    sql.push_str(" END");
    sql
}

// ---------------------------------------------------------------------------
// Query construction
// ---------------------------------------------------------------------------

/// Where the subscribers of an FMC dashboard come from
#[derive(Debug, Clone)]
pub struct FmcSource {
    pub kind: FmcDashboardKind,
    pub snapshot_table: String,
    orders_table: String,
    region: String,
    selected: NaiveDate,
}

impl FmcSource {
    pub fn new(kind: FmcDashboardKind, selected: NaiveDate, today: NaiveDate, region: &str) -> Self {
        Self {
            kind,
            snapshot_table: snapshot_table(selected, today),
            orders_table: orders_table(today),
            region: region.to_string(),
            selected,
        }
    }

    /// Key columns and FROM/JOIN/WHERE of the per-STO subquery
    fn source_sql(&self) -> SourceSql {
        match self.kind {
            FmcDashboardKind::LineInService => SourceSql {
                keys: "o.region AS region, o.branch AS branch, o.wok AS wok, o.sto_co AS sto"
                    .to_string(),
                body: format!(
                    "FROM household.{orders} o \
                     LEFT JOIN household.fmc_mcon_final_dd f ON o.service_id = f.notel \
                     LEFT JOIN multidim.{snapshot} m ON f.msisdn_recommendation = m.msisdn \
                     WHERE o.order_type = 'NEW SALES' AND o.region = ? \
                     AND MONTH(o.ps_ts) = ? AND YEAR(o.ps_ts) = ?",
                    orders = self.orders_table,
                    snapshot = self.snapshot_table
                ),
                values: vec![
                    self.region.clone().into(),
                    self.selected.month().into(),
                    self.selected.year().into(),
                ],
            },
            FmcDashboardKind::ConnectWifi => SourceSql {
                keys: format!(
                    "m.region_sales AS region, w.branch AS branch, {} AS wok, w.sto AS sto",
                    wok_case_sql("w.sto")
                ),
                body: format!(
                    "FROM zz_wisnu.WL_Prog_Ceria_202404_All w \
                     LEFT JOIN household.fmc_mcon_final_dd f ON w.notel_check = f.notel \
                     LEFT JOIN multidim.{} m ON f.msisdn_recommendation = m.msisdn",
                    self.snapshot_table
                ),
                values: Vec::new(),
            },
        }
    }
}

struct SourceSql {
    keys: String,
    body: String,
    values: Vec<Value>,
}

const LAGS: [&str; 4] = ["mtd", "m1", "m2", "m3"];
const RGB_CATEGORIES: [&str; 4] = ["all", "voice", "digital", "data"];

/// How a measure is summed up the hierarchy
#[derive(Clone, Copy)]
enum Measure {
    Amount,
    Count,
}

fn partition(level: TerritoryLevel) -> Option<&'static str> {
    match level {
        TerritoryLevel::Wok => Some("region, branch, wok"),
        TerritoryLevel::Branch => Some("region, branch"),
        TerritoryLevel::Region => Some("region"),
        _ => None,
    }
}

/// `{alias}_{level}` columns for every FMC level, from per-STO subquery values
fn level_sums(alias: &str, measure: Measure) -> Vec<String> {
    let cast = match measure {
        Measure::Amount => "DOUBLE",
        Measure::Count => "SIGNED",
    };
    FMC_HIERARCHY
        .iter()
        .map(|level| match partition(*level) {
            Some(by) => format!(
                "CAST(SUM(SUM({alias})) OVER (PARTITION BY {by}) AS {cast}) AS {alias}_{}",
                level.as_str()
            ),
            None => format!("CAST(SUM({alias}) AS {cast}) AS {alias}_{}", level.as_str()),
        })
        .collect()
}

fn distinct_active(revenue_column: &str, alias: &str) -> String {
    format!("COUNT(DISTINCT CASE WHEN m.{revenue_column} > 0 THEN m.msisdn END) AS {alias}")
}

fn wrap_with_level_sums(
    inner: Vec<String>,
    outer: Vec<String>,
    source: &FmcSource,
) -> (String, Vec<Value>) {
    let SourceSql { keys, body, values } = source.source_sql();
    let sql = format!(
        "SELECT region, branch, wok, sto, {} \
         FROM (SELECT {}, {} {} GROUP BY 1, 2, 3, 4) AS per_sto \
         GROUP BY 1, 2, 3, 4 ORDER BY 1, 2, 3, 4",
        outer.join(", "),
        keys,
        inner.join(", "),
        body
    );
    (sql, values)
}

/// Revenue, subscriber and payload sums per level
pub fn revenue_query(source: &FmcSource) -> (String, Vec<Value>) {
    let mut inner = vec![
        "SUM(m.vol_data_mtd) AS payload".to_string(),
        "SUM(m.vol_data_m1) AS payload_m1".to_string(),
    ];
    for (i, lag) in LAGS.iter().enumerate() {
        let alias = if i == 0 { "subs".to_string() } else { format!("subs_{lag}") };
        inner.push(distinct_active(&format!("rev_{lag}"), &alias));
    }
    for lag in LAGS {
        inner.push(format!("SUM(m.rev_{lag}) AS rev_{lag}"));
    }

    let mut outer = Vec::new();
    for alias in ["rev_mtd", "rev_m1", "rev_m2", "rev_m3", "payload", "payload_m1"] {
        outer.extend(level_sums(alias, Measure::Amount));
    }
    for alias in ["subs", "subs_m1", "subs_m2", "subs_m3"] {
        outer.extend(level_sums(alias, Measure::Count));
    }

    wrap_with_level_sums(inner, outer, source)
}

/// Revenue generating base per category and lag, per level
pub fn rgb_query(source: &FmcSource) -> (String, Vec<Value>) {
    let mut inner = Vec::new();
    let mut outer = Vec::new();
    for category in RGB_CATEGORIES {
        for lag in LAGS {
            let column = match category {
                "all" => format!("rev_{lag}"),
                _ => format!("rev_{category}_{lag}"),
            };
            let alias = format!("rgb_{category}_{lag}");
            inner.push(distinct_active(&column, &alias));
            outer.extend(level_sums(&alias, Measure::Count));
        }
    }
    wrap_with_level_sums(inner, outer, source)
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

fn level_index(level: TerritoryLevel) -> Option<usize> {
    FMC_HIERARCHY.iter().position(|l| *l == level)
}

fn get_f64(res: &QueryResult, pre: &str, column: &str) -> Result<f64, DbErr> {
    Ok(res.try_get::<Option<f64>>(pre, column)?.unwrap_or_default())
}

fn get_i64(res: &QueryResult, pre: &str, column: &str) -> Result<i64, DbErr> {
    Ok(res.try_get::<Option<i64>>(pre, column)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default)]
pub struct FmcKeys {
    pub region: Option<String>,
    pub branch: Option<String>,
    pub wok: Option<String>,
    pub sto: Option<String>,
}

/// Territory keys shared by both FMC row kinds
pub trait FmcKeyed {
    fn keys(&self) -> &FmcKeys;

    fn region_key(&self) -> Option<&str> {
        self.keys().region.as_deref()
    }

    fn branch_key(&self) -> Option<&str> {
        self.keys().branch.as_deref()
    }

    fn wok_key(&self) -> Option<&str> {
        self.keys().wok.as_deref()
    }

    fn sto_key(&self) -> Option<&str> {
        self.keys().sto.as_deref()
    }
}

impl FmcKeys {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            region: res.try_get(pre, "region")?,
            branch: res.try_get(pre, "branch")?,
            wok: res.try_get(pre, "wok")?,
            sto: res.try_get(pre, "sto")?,
        })
    }
}

/// One STO row of the revenue query with the sums of all its ancestors
#[derive(Debug, Clone, Default)]
pub struct FmcRevenueRow {
    pub keys: FmcKeys,
    /// Indexed like `FMC_HIERARCHY`
    pub by_level: [FmcMetrics; 4],
}

impl FmcRevenueRow {
    pub fn metrics_at(&self, level: TerritoryLevel) -> FmcMetrics {
        level_index(level)
            .map(|i| self.by_level[i])
            .unwrap_or_default()
    }
}

impl FmcKeyed for FmcRevenueRow {
    fn keys(&self) -> &FmcKeys {
        &self.keys
    }
}

impl FromQueryResult for FmcRevenueRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        let mut by_level = [FmcMetrics::default(); 4];
        for (metrics, level) in by_level.iter_mut().zip(FMC_HIERARCHY) {
            let col = |name: &str| format!("{name}_{}", level.as_str());
            *metrics = FmcMetrics {
                rev_mtd: get_f64(res, pre, &col("rev_mtd"))?,
                rev_m1: get_f64(res, pre, &col("rev_m1"))?,
                rev_m2: get_f64(res, pre, &col("rev_m2"))?,
                rev_m3: get_f64(res, pre, &col("rev_m3"))?,
                subs: get_i64(res, pre, &col("subs"))?,
                subs_m1: get_i64(res, pre, &col("subs_m1"))?,
                subs_m2: get_i64(res, pre, &col("subs_m2"))?,
                subs_m3: get_i64(res, pre, &col("subs_m3"))?,
                payload: get_f64(res, pre, &col("payload"))?,
                payload_m1: get_f64(res, pre, &col("payload_m1"))?,
                rgb: RgbCounters::default(),
            };
        }

        Ok(Self {
            keys: FmcKeys::from_query_result(res, pre)?,
            by_level,
        })
    }
}

/// One STO row of the RGB query
#[derive(Debug, Clone, Default)]
pub struct FmcRgbRow {
    pub keys: FmcKeys,
    pub by_level: [RgbCounters; 4],
}

impl FmcRgbRow {
    pub fn counters_at(&self, level: TerritoryLevel) -> RgbCounters {
        level_index(level)
            .map(|i| self.by_level[i])
            .unwrap_or_default()
    }
}

impl FmcKeyed for FmcRgbRow {
    fn keys(&self) -> &FmcKeys {
        &self.keys
    }
}

impl FromQueryResult for FmcRgbRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        let mut by_level = [RgbCounters::default(); 4];
        for (counters, level) in by_level.iter_mut().zip(FMC_HIERARCHY) {
            let lagged = |category: &str| -> Result<LaggedCount, DbErr> {
                let col = |lag: &str| format!("rgb_{category}_{lag}_{}", level.as_str());
                Ok(LaggedCount {
                    mtd: get_i64(res, pre, &col("mtd"))?,
                    m1: get_i64(res, pre, &col("m1"))?,
                    m2: get_i64(res, pre, &col("m2"))?,
                    m3: get_i64(res, pre, &col("m3"))?,
                })
            };
            *counters = RgbCounters {
                rgb_all: lagged("all")?,
                rgb_voice: lagged("voice")?,
                rgb_digital: lagged("digital")?,
                rgb_data: lagged("data")?,
            };
        }

        Ok(Self {
            keys: FmcKeys::from_query_result(res, pre)?,
            by_level,
        })
    }
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

pub async fn fetch_revenue_rows(source: &FmcSource) -> Result<Vec<FmcRevenueRow>, DashboardError> {
    let db = get_connection().await?;
    let (sql, values) = revenue_query(source);
    let stmt = Statement::from_sql_and_values(BACKEND, &sql, values);
    let rows = FmcRevenueRow::find_by_statement(stmt).all(db).await?;
    Ok(rows)
}

pub async fn fetch_rgb_rows(source: &FmcSource) -> Result<Vec<FmcRgbRow>, DashboardError> {
    let db = get_connection().await?;
    let (sql, values) = rgb_query(source);
    let stmt = Statement::from_sql_and_values(BACKEND, &sql, values);
    let rows = FmcRgbRow::find_by_statement(stmt).all(db).await?;
    Ok(rows)
}
