use dcg_error::Result;
use serde::Deserialize;

use crate::{
    collection::Collection, config::QueryConfig, configuration_error, model::Model, value::Value,
};

/// Settings a driver receives from its data provider information.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BaseConfig {
    source: Option<String>,
    #[serde(default, alias = "userId")]
    user_id: i64,
}

impl BaseConfig {
    pub fn new(source: &str, user_id: &i64) -> Self {
        Self {
            source: Some(source.to_owned()),
            user_id: *user_id,
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn set_source(&mut self, source: &str) -> &mut Self {
        self.source = Some(source.to_owned());
        self
    }

    pub fn user_id(&self) -> &i64 {
        &self.user_id
    }

    pub fn set_user_id(&mut self, user_id: &i64) -> &mut Self {
        self.user_id = *user_id;
        self
    }
}

/// What `fetch_all` hands back: bare ids for id-only queries, models
/// otherwise.
#[derive(Debug, Clone)]
pub enum Fetched {
    Ids(Vec<i64>),
    Models(Collection),
}

impl Fetched {
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Models(models) => models.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_ids(self) -> Option<Vec<i64>> {
        match self {
            Self::Ids(ids) => Some(ids),
            Self::Models(_) => None,
        }
    }

    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Self::Models(models) => Some(models),
            Self::Ids(_) => None,
        }
    }
}

/// The row a delete is aimed at.
#[derive(Debug, Clone)]
pub enum DeleteTarget<'a> {
    Id(Value),
    Model(&'a Model),
}

impl DeleteTarget<'_> {
    /// Any number or string resolves, as does a model carrying an id. A
    /// string that names no row simply deletes nothing.
    pub fn resolve(&self) -> Result<Value> {
        match self {
            Self::Id(id @ (Value::Int(_) | Value::Float(_) | Value::String(_))) => Ok(id.clone()),
            Self::Model(model) if model.id().is_some() => Ok(Value::from(model.id())),
            _ => Err(configuration_error(
                "ID missing or given object not of type model.",
            )),
        }
    }
}

impl From<i64> for DeleteTarget<'_> {
    fn from(id: i64) -> Self {
        Self::Id(Value::Int(id))
    }
}

impl From<&str> for DeleteTarget<'_> {
    fn from(id: &str) -> Self {
        Self::Id(Value::from(id))
    }
}

impl<'a> From<&'a Model> for DeleteTarget<'a> {
    fn from(model: &'a Model) -> Self {
        Self::Model(model)
    }
}

/// A data provider: reads and writes the models of one source table,
/// keeps their version history and logs undo snapshots before deletes.
pub trait DataDriver {
    fn set_base_config(&mut self, config: BaseConfig) -> Result<()>;

    fn empty_config(&self) -> QueryConfig {
        QueryConfig::init()
    }

    fn empty_model(&self) -> Model;

    fn empty_collection(&self) -> Collection {
        Collection::new()
    }

    /// The row with the configured id, or the first row matching the
    /// filter and sorting. `None` when nothing matches.
    async fn fetch(&self, config: &QueryConfig) -> Result<Option<Model>>;

    async fn fetch_all(&self, config: &QueryConfig) -> Result<Fetched>;

    /// Distinct values of the single projected property.
    async fn filter_options(&self, config: &QueryConfig) -> Result<Collection>;

    async fn count(&self, config: &QueryConfig) -> Result<i64>;

    async fn is_unique_value(&self, field: &str, value: &Value, exclude_id: Option<i64>)
        -> Result<bool>;

    async fn reset_fallback(&self, field: &str) -> Result<()>;

    /// Inserts the model when it has no id yet, updates it otherwise.
    /// Returns the id the model is stored under.
    async fn save(&self, model: &mut Model) -> Result<i64>;

    async fn save_each(&self, models: &Collection) -> Result<()>;

    async fn delete(&self, target: DeleteTarget<'_>) -> Result<()>;

    async fn field_exists(&self, field: &str) -> Result<bool>;

    async fn save_version(&self, model: &Model, username: &str) -> Result<i64>;

    async fn set_version_active(&self, id: i64, version: i64) -> Result<()>;

    async fn version(&self, id: i64, version: i64) -> Result<Option<Model>>;

    async fn versions(&self, id: i64, only_active: bool) -> Result<Collection>;

    async fn active_version(&self, id: i64) -> Result<Option<i64>>;

    fn same_models(&self, first: &Model, second: &Model) -> bool {
        first.same_properties(second)
    }
}
