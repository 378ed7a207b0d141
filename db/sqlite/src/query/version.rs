use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite, SqliteConnection};

use crate::{db::SqliteDb, model::version::VersionModel};

const COLUMNS: &str = "\"id\", \"pid\", \"tstamp\", \"version\", \"fromTable\", \"username\", \"active\", \"data\"";

const INSERT: &str = "INSERT INTO \"tl_version\" (\"pid\", \"tstamp\", \"version\", \"fromTable\", \"username\", \"active\", \"data\") VALUES (?, ?, ?, ?, ?, 0, ?)";
const COUNT_BY_PID: &str = "SELECT COUNT(1) FROM \"tl_version\" WHERE \"pid\" = ? AND \"fromTable\" = ?";
const DEACTIVATE_ALL: &str = "UPDATE \"tl_version\" SET \"active\" = 0 WHERE \"pid\" = ? AND \"fromTable\" = ?";
const SELECT_ACTIVE: &str = "SELECT \"version\" FROM \"tl_version\" WHERE \"pid\" = ? AND \"fromTable\" = ? AND \"active\" = 1";
const ACTIVATE: &str = "UPDATE \"tl_version\" SET \"active\" = 1 WHERE \"pid\" = ? AND \"version\" = ? AND \"fromTable\" = ?";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    dcg_log::info(Some("🔧"), "[SQLite] Setting up tl_version table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"tl_version\" (\"id\" integer PRIMARY KEY AUTOINCREMENT, \"pid\" integer NOT NULL, \"tstamp\" integer NOT NULL, \"version\" integer NOT NULL, \"fromTable\" text NOT NULL, \"username\" text NOT NULL DEFAULT '', \"active\" integer NOT NULL DEFAULT 0, \"data\" text NOT NULL)").await?;
    pool.execute("CREATE INDEX IF NOT EXISTS \"tl_version_pid_fromTable\" ON \"tl_version\" (\"pid\", \"fromTable\")").await?;

    Ok(())
}

impl SqliteDb {
    /// Stores `data` as the next version of the row `pid` in `from_table` and
    /// makes it the active one. Counting, inserting and activating share one
    /// transaction so two writers cannot hand out the same version number.
    /// Returns the new version number.
    pub async fn insert_version(
        &self,
        pid: &i64,
        from_table: &str,
        tstamp: &i64,
        username: &str,
        data: &str,
    ) -> Result<i64> {
        let mut tx = self.begin().await?;

        dcg_log::sql(COUNT_BY_PID, &[pid.to_string(), from_table.to_owned()]);
        let (count,): (i64,) = sqlx::query_as(COUNT_BY_PID)
            .bind(pid)
            .bind(from_table)
            .fetch_one(&mut *tx)
            .await?;
        let version = count + 1;

        dcg_log::sql(
            INSERT,
            &[
                pid.to_string(),
                tstamp.to_string(),
                version.to_string(),
                from_table.to_owned(),
                username.to_owned(),
                data.to_owned(),
            ],
        );
        sqlx::query(INSERT)
            .bind(pid)
            .bind(tstamp)
            .bind(version)
            .bind(from_table)
            .bind(username)
            .bind(data)
            .execute(&mut *tx)
            .await?;

        Self::activate_version(&mut tx, pid, from_table, &version).await?;

        tx.commit().await?;
        Ok(version)
    }

    pub async fn update_version_active(
        &self,
        pid: &i64,
        from_table: &str,
        version: &i64,
    ) -> Result<()> {
        let mut tx = self.begin().await?;
        Self::activate_version(&mut tx, pid, from_table, version).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn select_version(
        &self,
        pid: &i64,
        from_table: &str,
        version: &i64,
    ) -> Result<Option<VersionModel>> {
        let sql = format!("SELECT {COLUMNS} FROM \"tl_version\" WHERE \"pid\" = ? AND \"version\" = ? AND \"fromTable\" = ?");
        dcg_log::sql(&sql, &[pid.to_string(), version.to_string(), from_table.to_owned()]);
        self.fetch_optional(sqlx::query_as(&sql).bind(pid).bind(version).bind(from_table))
            .await
    }

    /// Lists the versions of a row, newest first.
    pub async fn select_many_versions(
        &self,
        pid: &i64,
        from_table: &str,
        only_active: &bool,
    ) -> Result<Vec<VersionModel>> {
        let mut sql = format!("SELECT {COLUMNS} FROM \"tl_version\" WHERE \"fromTable\" = ? AND \"pid\" = ?");
        if *only_active {
            sql += " AND \"active\" = 1";
        }
        sql += " ORDER BY \"version\" DESC";
        dcg_log::sql(&sql, &[from_table.to_owned(), pid.to_string()]);

        self.fetch_all(sqlx::query_as(&sql).bind(from_table).bind(pid))
            .await
    }

    pub async fn select_active_version(&self, pid: &i64, from_table: &str) -> Result<Option<i64>> {
        dcg_log::sql(SELECT_ACTIVE, &[pid.to_string(), from_table.to_owned()]);
        Ok(self
            .fetch_optional::<(i64,)>(sqlx::query_as(SELECT_ACTIVE).bind(pid).bind(from_table))
            .await?
            .map(|(version,)| version))
    }

    async fn activate_version(
        conn: &mut SqliteConnection,
        pid: &i64,
        from_table: &str,
        version: &i64,
    ) -> Result<()> {
        dcg_log::sql(DEACTIVATE_ALL, &[pid.to_string(), from_table.to_owned()]);
        sqlx::query(DEACTIVATE_ALL)
            .bind(pid)
            .bind(from_table)
            .execute(&mut *conn)
            .await?;
        dcg_log::sql(
            ACTIVATE,
            &[pid.to_string(), version.to_string(), from_table.to_owned()],
        );
        sqlx::query(ACTIVATE)
            .bind(pid)
            .bind(version)
            .bind(from_table)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
