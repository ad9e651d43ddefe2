use sea_orm::{FromQueryResult, Statement};

use crate::shared::data::warehouse::{get_connection, BACKEND};
use crate::shared::error::DashboardError;

/// One kabupaten of the sales area master data with all its ancestors.
/// Territories without children come back once with the lower levels null.
#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct SalesAreaRow {
    pub region_id: Option<String>,
    pub region: Option<String>,
    pub branch_id: Option<String>,
    pub branch: Option<String>,
    pub subbranch_id: Option<String>,
    pub subbranch: Option<String>,
    pub cluster_id: Option<String>,
    pub cluster: Option<String>,
    pub kabupaten_id: Option<String>,
    pub kabupaten: Option<String>,
}

impl SalesAreaRow {
    /// Levels present on this row; a territory without children ends early
    pub fn depth(&self) -> usize {
        [
            &self.region_id,
            &self.branch_id,
            &self.subbranch_id,
            &self.cluster_id,
            &self.kabupaten_id,
        ]
        .iter()
        .take_while(|id| id.is_some())
        .count()
    }

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
}

/// One STO of the FMC area master data with all its ancestors
#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct FmcAreaRow {
    pub region_id: Option<String>,
    pub region: Option<String>,
    pub branch_id: Option<String>,
    pub branch: Option<String>,
    pub wok_id: Option<String>,
    pub wok: Option<String>,
    pub sto_id: Option<String>,
    pub sto: Option<String>,
}

impl FmcAreaRow {
    pub fn depth(&self) -> usize {
        [&self.region_id, &self.branch_id, &self.wok_id, &self.sto_id]
            .iter()
            .take_while(|id| id.is_some())
            .count()
    }

    pub fn region_key(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn branch_key(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn wok_key(&self) -> Option<&str> {
        self.wok.as_deref()
    }

    pub fn sto_key(&self) -> Option<&str> {
        self.sto.as_deref()
    }
}

pub const SALES_AREAS_SQL: &str = "\
SELECT r.id AS region_id, r.regional AS region, \
b.id AS branch_id, b.branch_new AS branch, \
s.id AS subbranch_id, s.subbranch_new AS subbranch, \
c.id AS cluster_id, c.cluster AS cluster, \
k.id AS kabupaten_id, k.kabupaten AS kabupaten \
FROM puma_2025.regionals r \
LEFT JOIN puma_2025.branches_new b ON b.id_regional = r.id \
LEFT JOIN puma_2025.subbranches_new s ON s.id_branch = b.id \
LEFT JOIN puma_2025.clusters_new c ON c.subbranch_id = s.id \
LEFT JOIN puma_2025.kabupatens k ON k.id_cluster = c.id \
ORDER BY r.regional, b.branch_new, s.subbranch_new, c.cluster, k.kabupaten";

// WOK and STO keys are integers
pub const FMC_AREAS_SQL: &str = "\
SELECT r.id AS region_id, r.regional AS region, \
b.id AS branch_id, b.branch_new AS branch, \
CAST(w.id AS CHAR) AS wok_id, w.wok AS wok, \
CAST(t.id AS CHAR) AS sto_id, t.sto AS sto \
FROM puma_2025.regionals r \
LEFT JOIN puma_2025.branches_new b ON b.id_regional = r.id \
LEFT JOIN puma_2025.wok w ON w.branch_id = b.id \
LEFT JOIN puma_2025.sto t ON t.wok_id = w.id \
ORDER BY r.regional, b.branch_new, w.wok, t.sto";

pub async fn list_sales_areas() -> Result<Vec<SalesAreaRow>, DashboardError> {
    let db = get_connection().await?;
    let stmt = Statement::from_string(BACKEND, SALES_AREAS_SQL);
    Ok(SalesAreaRow::find_by_statement(stmt).all(db).await?)
}

pub async fn list_fmc_areas() -> Result<Vec<FmcAreaRow>, DashboardError> {
    let db = get_connection().await?;
    let stmt = Statement::from_string(BACKEND, FMC_AREAS_SQL);
    Ok(FmcAreaRow::find_by_statement(stmt).all(db).await?)
}
