use std::sync::Arc;

use chrono::Utc;
use dcg_db_sqlite::{db::SqliteDb, model::undo::UndoModel, query::record};
use dcg_error::Result;
use indexmap::IndexMap;
use sqlx::{
    sqlite::{SqliteQueryResult, SqliteRow},
    Column, Row,
};

use crate::{
    collection::Collection,
    config::QueryConfig,
    configuration_error,
    driver::{BaseConfig, DataDriver, DeleteTarget, Fetched},
    filter,
    model::Model,
    value::{bind_all, Value},
};

const UNDO_LABEL: &str = "(DC General) ";

/// Data provider backed by one table of the SQLite store.
pub struct DefaultDriver {
    db: Arc<SqliteDb>,
    source: Option<String>,
    user_id: i64,
}

impl DefaultDriver {
    pub fn new(db: Arc<SqliteDb>) -> Self {
        Self {
            db,
            source: None,
            user_id: 0,
        }
    }

    pub fn db(&self) -> &Arc<SqliteDb> {
        &self.db
    }

    pub fn user_id(&self) -> &i64 {
        &self.user_id
    }

    pub fn source(&self) -> Result<&str> {
        self.source
            .as_deref()
            .ok_or_else(|| configuration_error("Missing table name."))
    }

    fn build_fields(config: &QueryConfig) -> String {
        if config.id_only() {
            return "id".to_owned();
        }
        match config.fields() {
            Some(fields) if !fields.is_empty() => {
                let fields = fields.join(", ");
                if fields.to_lowercase().contains("distinct") {
                    fields
                } else {
                    format!("id, {fields}")
                }
            }
            _ => "*".to_owned(),
        }
    }

    fn build_where(config: &QueryConfig, params: &mut Vec<Value>) -> String {
        match config.filter() {
            Some(filters) => filter::compile_where(filters, params),
            None => String::new(),
        }
    }

    fn build_sorting(config: &QueryConfig) -> Vec<(&str, &str)> {
        config
            .sorting()
            .map(|sorting| {
                sorting
                    .iter()
                    .map(|(property, direction)| (property.as_str(), direction.to_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn rows(&self, sql: &str, params: &[Value]) -> Result<Vec<SqliteRow>> {
        dcg_log::sql(sql, params);
        Ok(self
            .db
            .fetch_all_rows(bind_all(sqlx::query(sql), params)?)
            .await?)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<SqliteQueryResult> {
        dcg_log::sql(sql, params);
        Ok(self.db.execute(bind_all(sqlx::query(sql), params)?).await?)
    }

    fn model_from_row(&self, row: &SqliteRow) -> Result<Model> {
        let mut model = self.empty_model();
        for column in row.columns() {
            let value = Value::from_sqlitedb_model(row, column.ordinal())?;
            if column.name() == "id" {
                if let Value::Int(id) = value {
                    model.set_id(id);
                }
            }
            model.set_property(column.name(), value);
        }
        Ok(model)
    }

    fn row_to_json(row: &SqliteRow) -> Result<serde_json::Value> {
        let mut object = serde_json::Map::new();
        for column in row.columns() {
            let value = Value::from_sqlitedb_model(row, column.ordinal())?;
            object.insert(column.name().to_owned(), value.to_serde_json());
        }
        Ok(serde_json::Value::Object(object))
    }

    /// Captures the rows `save_sql` selects into `tl_undo` before
    /// `source_sql` destroys them. Nothing is written when no row matches.
    async fn insert_undo(
        &self,
        source_sql: &str,
        save_sql: &str,
        params: &[Value],
        table: &str,
    ) -> Result<()> {
        let rows = self.rows(save_sql, params).await?;
        if rows.is_empty() {
            return Ok(());
        }

        let captured = rows
            .iter()
            .map(Self::row_to_json)
            .collect::<Result<Vec<_>>>()?;
        let affected_rows = captured.len() as i64;
        let mut data = serde_json::Map::new();
        data.insert(table.to_owned(), serde_json::Value::Array(captured));

        let undo = UndoModel::new(
            &self.user_id,
            &Utc::now().timestamp(),
            table,
            &format!("{UNDO_LABEL}{source_sql}"),
            &affected_rows,
            &serde_json::to_string(&data)?,
        );
        self.db.insert_undo(&undo).await?;

        dcg_log::debug(
            Some("↩️"),
            format!("[Driver] Stored undo snapshot of {affected_rows} row(s) from {table}"),
        );
        Ok(())
    }
}

impl DataDriver for DefaultDriver {
    fn set_base_config(&mut self, config: BaseConfig) -> Result<()> {
        let source = config
            .source()
            .ok_or_else(|| configuration_error("Missing table name."))?;
        self.source = Some(source.to_owned());
        self.user_id = *config.user_id();
        Ok(())
    }

    fn empty_model(&self) -> Model {
        match &self.source {
            Some(source) => Model::with_provider(source),
            None => Model::new(),
        }
    }

    async fn fetch(&self, config: &QueryConfig) -> Result<Option<Model>> {
        let source = self.source()?;
        let fields = Self::build_fields(config);

        let rows = match config.id() {
            Some(id) => {
                self.rows(&record::select_by_id(source, &fields), &[Value::Int(id)])
                    .await?
            }
            None => {
                let mut params = Vec::new();
                let filter = Self::build_where(config, &mut params);
                let sql = record::select_many(
                    source,
                    &fields,
                    &filter,
                    &Self::build_sorting(config),
                    &true,
                );
                params.push(Value::Int(1));
                params.push(Value::Int(0));
                self.rows(&sql, &params).await?
            }
        };

        match rows.first() {
            Some(row) => Ok(Some(self.model_from_row(row)?)),
            None => Ok(None),
        }
    }

    async fn fetch_all(&self, config: &QueryConfig) -> Result<Fetched> {
        let source = self.source()?;
        let mut params = Vec::new();
        let filter = Self::build_where(config, &mut params);
        let with_limit = config.amount() != 0;
        let sql = record::select_many(
            source,
            &Self::build_fields(config),
            &filter,
            &Self::build_sorting(config),
            &with_limit,
        );
        if with_limit {
            params.push(Value::Int(i64::try_from(config.amount()).unwrap_or(i64::MAX)));
            params.push(Value::Int(i64::try_from(config.start()).unwrap_or(i64::MAX)));
        }

        let rows = self.rows(&sql, &params).await?;

        if config.id_only() {
            let ids = rows
                .iter()
                .map(|row| row.try_get::<i64, _>("id"))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(anyhow::Error::from)?;
            return Ok(Fetched::Ids(ids));
        }

        let mut collection = self.empty_collection();
        for row in &rows {
            collection.push(self.model_from_row(row)?.into_ref());
        }
        Ok(Fetched::Models(collection))
    }

    async fn filter_options(&self, config: &QueryConfig) -> Result<Collection> {
        let source = self.source()?;
        let property = match config.fields().map(Vec::as_slice) {
            Some([property]) => property,
            _ => {
                return Err(configuration_error(
                    "objConfig must contain exactly one property to be retrieved.",
                ))
            }
        };

        let mut params = Vec::new();
        let filter = Self::build_where(config, &mut params);
        let rows = self
            .rows(&record::select_distinct(source, property, &filter), &params)
            .await?;

        let mut collection = self.empty_collection();
        for row in &rows {
            let mut model = self.empty_model();
            model.set_property(property, Value::from_sqlitedb_model(row, 0)?);
            collection.push(model.into_ref());
        }
        Ok(collection)
    }

    async fn count(&self, config: &QueryConfig) -> Result<i64> {
        let source = self.source()?;
        let mut params = Vec::new();
        let filter = Self::build_where(config, &mut params);
        let rows = self.rows(&record::count(source, &filter), &params).await?;

        match rows.first() {
            Some(row) => Ok(row
                .try_get::<i64, _>("count")
                .map_err(anyhow::Error::from)?),
            None => Ok(0),
        }
    }

    async fn is_unique_value(
        &self,
        field: &str,
        value: &Value,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let source = self.source()?;
        let rows = self
            .rows(
                &record::select_ids_by_field(source, field),
                std::slice::from_ref(value),
            )
            .await?;

        match rows.as_slice() {
            [] => Ok(true),
            [row] => {
                let id = row.try_get::<i64, _>("id").map_err(anyhow::Error::from)?;
                Ok(exclude_id == Some(id))
            }
            _ => Ok(false),
        }
    }

    async fn reset_fallback(&self, field: &str) -> Result<()> {
        let source = self.source()?;
        self.execute(&record::blank_column(source, field), &[])
            .await?;
        Ok(())
    }

    async fn save(&self, model: &mut Model) -> Result<i64> {
        let source = self.source()?;
        let (columns, mut params): (Vec<&str>, Vec<Value>) = model
            .properties()
            .iter()
            .filter(|(name, _)| name.as_str() != "id")
            .map(|(name, value)| (name.as_str(), value.clone()))
            .unzip();

        match model.id() {
            None => {
                let result = self
                    .execute(&record::insert(source, &columns), &params)
                    .await?;
                let id = result.last_insert_rowid();
                model.set_id(id);
                Ok(id)
            }
            Some(id) => {
                if !columns.is_empty() {
                    params.push(Value::Int(id));
                    self.execute(&record::update(source, &columns), &params)
                        .await?;
                }
                Ok(id)
            }
        }
    }

    async fn save_each(&self, models: &Collection) -> Result<()> {
        for model in models {
            let mut saving = model.borrow().clone();
            let id = self.save(&mut saving).await?;
            model.borrow_mut().set_id(id);
        }
        Ok(())
    }

    async fn delete(&self, target: DeleteTarget<'_>) -> Result<()> {
        let source = self.source()?;
        let id = target.resolve()?;

        self.insert_undo(
            &format!("DELETE FROM {source} WHERE id = {}", id.to_text()),
            &record::select_by_id(source, "*"),
            std::slice::from_ref(&id),
            source,
        )
        .await?;

        self.execute(&record::delete(source), &[id]).await?;
        Ok(())
    }

    async fn field_exists(&self, field: &str) -> Result<bool> {
        let source = self.source()?;
        let columns = self.db.select_column_names(source).await?;
        Ok(columns.iter().any(|column| column == field))
    }

    async fn save_version(&self, model: &Model, username: &str) -> Result<i64> {
        let source = self.source()?;
        let id = model
            .id()
            .ok_or_else(|| configuration_error("Cannot store a version of a model without id."))?;

        let mut data: IndexMap<String, Value> = model.properties().clone();
        data.insert("id".to_owned(), Value::Int(id));
        let data = serde_json::to_string(&data)?;

        let version = self
            .db
            .insert_version(&id, source, &Utc::now().timestamp(), username, &data)
            .await?;

        dcg_log::debug(
            Some("🗃️"),
            format!("[Driver] Stored version {version} of {source}.{id}"),
        );
        Ok(version)
    }

    async fn set_version_active(&self, id: i64, version: i64) -> Result<()> {
        let source = self.source()?;
        self.db
            .update_version_active(&id, source, &version)
            .await?;
        Ok(())
    }

    async fn version(&self, id: i64, version: i64) -> Result<Option<Model>> {
        let source = self.source()?;
        let Some(stored) = self.db.select_version(&id, source, &version).await? else {
            return Ok(None);
        };

        let data = match serde_json::from_str::<Value>(stored.data()) {
            Ok(Value::Map(data)) if !data.is_empty() => data,
            _ => return Ok(None),
        };

        let mut model = self.empty_model();
        model.set_id(id);
        for (name, value) in data {
            if name != "id" {
                model.set_property(&name, value);
            }
        }
        Ok(Some(model))
    }

    async fn versions(&self, id: i64, only_active: bool) -> Result<Collection> {
        let source = self.source()?;
        let stored = self
            .db
            .select_many_versions(&id, source, &only_active)
            .await?;

        let mut collection = self.empty_collection();
        for version in &stored {
            let mut model = self.empty_model();
            model
                .set_id(id)
                .set_property("tstamp", *version.tstamp())
                .set_property("version", *version.version())
                .set_property("username", version.username())
                .set_property("active", *version.active());
            collection.push(model.into_ref());
        }
        Ok(collection)
    }

    async fn active_version(&self, id: i64) -> Result<Option<i64>> {
        let source = self.source()?;
        Ok(self.db.select_active_version(&id, source).await?)
    }
}
