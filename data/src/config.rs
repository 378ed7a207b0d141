use dcg_error::Result;
use indexmap::IndexMap;

use crate::{
    configuration_error,
    filter::{self, Filter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact token `DESC` sorts descending.
    pub fn from_token(token: &str) -> Self {
        match token {
            "DESC" => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Describes what a driver should read: one row by id, or a filtered,
/// sorted and paginated set of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryConfig {
    id: Option<i64>,
    fields: Option<Vec<String>>,
    id_only: bool,
    filter: Option<Vec<Filter>>,
    sorting: Option<IndexMap<String, SortDirection>>,
    start: u64,
    amount: u64,
}

impl QueryConfig {
    pub fn init() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) -> &mut Self {
        self.id = Some(id);
        self
    }

    pub fn fields(&self) -> Option<&Vec<String>> {
        self.fields.as_ref()
    }

    pub fn set_fields(&mut self, fields: Vec<String>) -> &mut Self {
        self.fields = Some(fields);
        self
    }

    pub fn id_only(&self) -> bool {
        self.id_only
    }

    pub fn set_id_only(&mut self, id_only: bool) -> &mut Self {
        self.id_only = id_only;
        self
    }

    pub fn filter(&self) -> Option<&Vec<Filter>> {
        self.filter.as_ref()
    }

    pub fn set_filter(&mut self, filter: Vec<Filter>) -> &mut Self {
        self.filter = Some(filter);
        self
    }

    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        self.filter.get_or_insert_with(Vec::new).push(filter);
        self
    }

    pub fn sorting(&self) -> Option<&IndexMap<String, SortDirection>> {
        self.sorting.as_ref()
    }

    pub fn set_sorting(&mut self, sorting: IndexMap<String, SortDirection>) -> &mut Self {
        self.sorting = Some(sorting);
        self
    }

    pub fn add_sorting(&mut self, property: &str, direction: SortDirection) -> &mut Self {
        self.sorting
            .get_or_insert_with(IndexMap::new)
            .insert(property.to_owned(), direction);
        self
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn set_start(&mut self, start: u64) -> &mut Self {
        self.start = start;
        self
    }

    /// `0` means unlimited.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: u64) -> &mut Self {
        self.amount = amount;
        self
    }

    /// Builds a config from its wire form. Recognised keys are `id`,
    /// `fields`, `idOnly`, `filter`, `sorting`, `start` and `amount`; unknown
    /// keys are ignored.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| configuration_error(format!("Invalid query config: {value}")))?;
        let mut config = Self::init();

        if let Some(id) = object.get("id").filter(|id| !id.is_null()) {
            let id = match id {
                serde_json::Value::Number(id) => id.as_i64(),
                serde_json::Value::String(id) => id.trim().parse().ok(),
                _ => None,
            }
            .ok_or_else(|| configuration_error(format!("Invalid id in query config: {id}")))?;
            config.set_id(id);
        }
        if let Some(fields) = object.get("fields").filter(|fields| !fields.is_null()) {
            let fields = fields
                .as_array()
                .and_then(|fields| {
                    fields
                        .iter()
                        .map(|field| field.as_str().map(str::to_owned))
                        .collect::<Option<Vec<_>>>()
                })
                .ok_or_else(|| {
                    configuration_error(format!("Invalid fields in query config: {fields}"))
                })?;
            config.set_fields(fields);
        }
        if let Some(id_only) = object.get("idOnly").and_then(serde_json::Value::as_bool) {
            config.set_id_only(id_only);
        }
        if let Some(filter) = object.get("filter").filter(|filter| !filter.is_null()) {
            config.set_filter(filter::from_json_list(filter)?);
        }
        if let Some(sorting) = object.get("sorting").filter(|sorting| !sorting.is_null()) {
            let sorting = sorting
                .as_object()
                .ok_or_else(|| {
                    configuration_error(format!("Invalid sorting in query config: {sorting}"))
                })?
                .iter()
                .map(|(property, direction)| {
                    (
                        property.to_owned(),
                        SortDirection::from_token(direction.as_str().unwrap_or_default()),
                    )
                })
                .collect();
            config.set_sorting(sorting);
        }
        if let Some(start) = object.get("start").and_then(serde_json::Value::as_u64) {
            config.set_start(start);
        }
        if let Some(amount) = object.get("amount").and_then(serde_json::Value::as_u64) {
            config.set_amount(amount);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_directions_sort_ascending() {
        assert_eq!(SortDirection::from_token("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::from_token("desc"), SortDirection::Asc);
        assert_eq!(SortDirection::from_token(" DESC "), SortDirection::Asc);
        assert_eq!(SortDirection::from_token("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::from_token("sideways"), SortDirection::Asc);
        assert_eq!(SortDirection::from_token(""), SortDirection::Asc);
    }

    #[test]
    fn defaults_select_everything() {
        let config = QueryConfig::init();
        assert_eq!(config.id(), None);
        assert!(config.fields().is_none());
        assert!(!config.id_only());
        assert!(config.filter().is_none());
        assert!(config.sorting().is_none());
        assert_eq!((config.start(), config.amount()), (0, 0));
    }

    #[test]
    fn reads_wire_form() {
        let config = QueryConfig::from_json(&json!({
            "id": "7",
            "fields": ["name", "age"],
            "idOnly": true,
            "filter": [{"operation": ">", "property": "age", "value": 30}],
            "sorting": {"name": "DESC", "age": "up"},
            "start": 10,
            "amount": 5,
            "panel": "ignored"
        }))
        .unwrap();

        assert_eq!(config.id(), Some(7));
        assert_eq!(
            config.fields(),
            Some(&vec!["name".to_owned(), "age".to_owned()])
        );
        assert!(config.id_only());
        assert_eq!(config.filter(), Some(&vec![Filter::greater_than("age", 30)]));
        let sorting: Vec<(&str, SortDirection)> = config
            .sorting()
            .unwrap()
            .iter()
            .map(|(property, direction)| (property.as_str(), *direction))
            .collect();
        assert_eq!(
            sorting,
            vec![("name", SortDirection::Desc), ("age", SortDirection::Asc)]
        );
        assert_eq!((config.start(), config.amount()), (10, 5));
    }

    #[test]
    fn rejects_malformed_wire_form() {
        assert!(QueryConfig::from_json(&json!([])).is_err());
        assert!(QueryConfig::from_json(&json!({"id": "seven"})).is_err());
        assert!(QueryConfig::from_json(&json!({"fields": "name"})).is_err());
        assert!(QueryConfig::from_json(&json!({"filter": [{"operation": "NOT"}]})).is_err());
    }
}
