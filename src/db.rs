use anyhow::{Context, Result};
use directories::ProjectDirs;
use sqlx::{any::AnyConnectOptions, AnyPool, ConnectOptions, migrate::Migrator};
use sqlx::any::AnyPoolOptions;
use std::{path::PathBuf, str::FromStr};
use std::sync::Once;
use tracing::debug;

use crate::storage::Storage;

// Ensure drivers are installed exactly once for sqlx::any
static INSTALL_DRIVERS: Once = Once::new();

// Embed SQL migrations from the migrations/ directory
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed key-value store.
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    // Create a connection pool. If database_url is None, use a SQLite file in
    // the user's data directory.
    pub async fn connect(database_url: Option<&str>) -> Result<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let url = match database_url {
            Some(u) if !u.trim().is_empty() => u.to_string(),
            _ => default_sqlite_url()?,
        };

        let opts = AnyConnectOptions::from_str(&url)
            .with_context(|| format!("invalid database URL: {url}"))?;
        // Quiet by default; callers can enable SQLX_LOG if they want
        let opts = opts.disable_statement_logging();

        // Every in-memory connection is its own database
        let max_connections = if url.contains(":memory:") { 1 } else { 4 };

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await
            .with_context(|| format!("failed to connect to database: {url}"))?;

        debug!(%url, "opened key-value database");
        Ok(Self { pool })
    }

    /// Connect and apply embedded migrations.
    pub async fn open(database_url: Option<&str>) -> Result<Self> {
        let db = Self::connect(database_url).await?;
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.context("running migrations")
    }

}

#[async_trait::async_trait]
impl Storage for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("reading key {key}"))?;
        Ok(row)
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO kv_store(key, value) VALUES (?, ?)\n             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("writing key {key}"))?;
        Ok(())
    }
}

fn default_sqlite_url() -> Result<String> {
    let proj = ProjectDirs::from("dev", "empire", "empire")
        .context("unable to determine data directory for default sqlite path")?;
    let mut path: PathBuf = proj.data_dir().to_path_buf();
    std::fs::create_dir_all(&path).with_context(|| format!("creating data dir: {}", path.display()))?;
    path.push("empire.db");
    Ok(sqlite_url_for(&path))
}

/// Build a read-write-create SQLite URL for a filesystem path.
pub fn sqlite_url_for(path: &std::path::Path) -> String {
    // Encode spaces in the path for a valid sqlite URL
    let path_str = path.to_string_lossy().replace(' ', "%20");
    format!("sqlite://{path_str}?mode=rwc")
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_db(dir: &tempfile::TempDir) -> Database {
        let url = sqlite_url_for(&dir.path().join("empire.db"));
        Database::open(Some(&url)).await.unwrap()
    }

    #[tokio::test]
    async fn values_survive_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = temp_db(&dir).await;
            db.put("issb_dark_mode", "true").await.unwrap();
            db.put("issb_dark_mode", "false").await.unwrap();
        }
        let db = temp_db(&dir).await;
        assert_eq!(db.get("issb_dark_mode").await.unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn missing_keys_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let db = temp_db(&dir).await;
        assert_eq!(db.get("nope").await.unwrap(), None);
        db.put("k", "v").await.unwrap();
        assert_eq!(db.get("nope").await.unwrap(), None);
    }

    #[test]
    fn url_encodes_spaces() {
        let url = sqlite_url_for(std::path::Path::new("/tmp/my dir/empire.db"));
        assert_eq!(url, "sqlite:///tmp/my%20dir/empire.db?mode=rwc");
    }
}
