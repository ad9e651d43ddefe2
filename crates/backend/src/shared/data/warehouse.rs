use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::shared::config::{self, WarehouseConfig};
use crate::shared::error::DashboardError;

static WAREHOUSE_CONN: OnceCell<DatabaseConnection> = OnceCell::const_new();

pub const BACKEND: sea_orm::DatabaseBackend = sea_orm::DatabaseBackend::MySql;

/// Opens the read-only warehouse pool and checks it answers.
pub async fn connect(config: &WarehouseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let conn = Database::connect(options).await?;
    conn.execute(Statement::from_string(BACKEND, "SELECT 1".to_string()))
        .await?;

    tracing::info!(
        "Warehouse connection ready (max {} connections)",
        config.max_connections
    );
    Ok(conn)
}

/// Returns the connection held by `cell`, connecting first when it is empty.
/// A failed attempt leaves the cell empty so the next call tries again.
async fn connection_in<'a>(
    cell: &'a OnceCell<DatabaseConnection>,
    config: &WarehouseConfig,
) -> Result<&'a DatabaseConnection, DashboardError> {
    cell.get_or_try_init(|| connect(config))
        .await
        .map_err(|e| {
            tracing::warn!("Warehouse connection attempt failed: {}", e);
            DashboardError::from(e)
        })
}

/// Shared warehouse connection, opened on first use.
pub async fn get_connection() -> Result<&'static DatabaseConnection, DashboardError> {
    let config = config::get().ok_or(DashboardError::NotInitialized)?;
    connection_in(&WAREHOUSE_CONN, &config.warehouse).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_warehouse() -> WarehouseConfig {
        // no driver for this scheme is compiled in, so connecting fails at once
        WarehouseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    #[tokio::test]
    async fn test_failed_connect_is_retried_on_next_call() {
        let cell = OnceCell::new();
        let config = unreachable_warehouse();

        let first = connection_in(&cell, &config).await;
        assert!(matches!(first, Err(DashboardError::Warehouse(_))));
        assert!(!cell.initialized());

        let second = connection_in(&cell, &config).await;
        assert!(matches!(second, Err(DashboardError::Warehouse(_))));
        assert!(!cell.initialized());
    }

    #[test]
    fn test_failed_connect_is_reported_as_unavailable() {
        let err = DashboardError::from(DbErr::Conn(sea_orm::RuntimeErr::Internal(
            "refused".to_string(),
        )));
        assert_eq!(err.public_message(), "data unavailable");
    }
}
