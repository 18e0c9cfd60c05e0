


use configs::DatabaseConfig;
use sea_orm::DatabaseConnection;

/// Fresh, migrated in-memory database for a single test.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    crate::db::connect_and_migrate(&DatabaseConfig::in_memory()).await
}
