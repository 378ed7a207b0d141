use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite};

use crate::{db::SqliteDb, model::undo::UndoModel};

const INSERT: &str = "INSERT INTO \"tl_undo\" (\"pid\", \"tstamp\", \"fromTable\", \"query\", \"affectedRows\", \"data\") VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_MANY_BY_TABLE: &str = "SELECT \"id\", \"pid\", \"tstamp\", \"fromTable\", \"query\", \"affectedRows\", \"data\" FROM \"tl_undo\" WHERE \"fromTable\" = ? ORDER BY \"id\" DESC";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    dcg_log::info(Some("🔧"), "[SQLite] Setting up tl_undo table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"tl_undo\" (\"id\" integer PRIMARY KEY AUTOINCREMENT, \"pid\" integer NOT NULL, \"tstamp\" integer NOT NULL, \"fromTable\" text NOT NULL, \"query\" text NOT NULL, \"affectedRows\" integer NOT NULL, \"data\" text NOT NULL)").await?;

    Ok(())
}

impl SqliteDb {
    pub async fn insert_undo(&self, value: &UndoModel) -> Result<i64> {
        dcg_log::sql(
            INSERT,
            &[
                value.pid().to_string(),
                value.tstamp().to_string(),
                value.from_table().to_owned(),
                value.query().to_owned(),
                value.affected_rows().to_string(),
                value.data().to_owned(),
            ],
        );
        let result = self
            .execute(
                sqlx::query(INSERT)
                    .bind(value.pid())
                    .bind(value.tstamp())
                    .bind(value.from_table())
                    .bind(value.query())
                    .bind(value.affected_rows())
                    .bind(value.data()),
            )
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Lists the undo entries written for `from_table`, newest first.
    pub async fn select_many_undo_by_table(&self, from_table: &str) -> Result<Vec<UndoModel>> {
        dcg_log::sql(SELECT_MANY_BY_TABLE, &[from_table]);
        self.fetch_all(sqlx::query_as(SELECT_MANY_BY_TABLE).bind(from_table))
            .await
    }
}
