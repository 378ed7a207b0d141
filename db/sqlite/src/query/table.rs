use anyhow::Result;

use crate::db::SqliteDb;

const SELECT_TABLE_EXISTENCE: &str =
    "SELECT COUNT(1) FROM \"sqlite_master\" WHERE \"type\" = 'table' AND \"name\" = ?";
const SELECT_COLUMN_NAMES: &str = "SELECT \"name\" FROM pragma_table_info(?)";

impl SqliteDb {
    pub async fn check_table_existence(&self, table: &str) -> Result<bool> {
        dcg_log::sql(SELECT_TABLE_EXISTENCE, &[table]);
        Ok(self
            .fetch_one::<(i64,)>(sqlx::query_as(SELECT_TABLE_EXISTENCE).bind(table))
            .await?
            .0
            > 0)
    }

    pub async fn select_column_names(&self, table: &str) -> Result<Vec<String>> {
        dcg_log::sql(SELECT_COLUMN_NAMES, &[table]);
        Ok(self
            .fetch_all::<(String,)>(sqlx::query_as(SELECT_COLUMN_NAMES).bind(table))
            .await?
            .into_iter()
            .map(|(name,)| name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_tables_and_columns() {
        let db = SqliteDb::memory().await.unwrap();
        db.execute_unprepared(sqlx::query(
            "CREATE TABLE \"people\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \"name\" TEXT, \"fallback\" TEXT)",
        ))
        .await
        .unwrap();

        assert!(db.check_table_existence("people").await.unwrap());
        assert!(db.check_table_existence("tl_version").await.unwrap());
        assert!(!db.check_table_existence("pets").await.unwrap());
        assert_eq!(
            db.select_column_names("people").await.unwrap(),
            vec!["id".to_owned(), "name".to_owned(), "fallback".to_owned()]
        );
        assert!(db.select_column_names("pets").await.unwrap().is_empty());
    }
}
