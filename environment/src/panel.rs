use dcg_data::{Filter, QueryConfig, SortDirection};
use indexmap::IndexMap;

/// Filter, sorting and paging state chosen in the list panels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelContainer {
    filters: Vec<Filter>,
    sorting: IndexMap<String, SortDirection>,
    limit: Option<(u64, u64)>,
}

impl PanelContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &Vec<Filter> {
        &self.filters
    }

    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    pub fn sorting(&self) -> &IndexMap<String, SortDirection> {
        &self.sorting
    }

    pub fn add_sorting(&mut self, property: &str, direction: SortDirection) -> &mut Self {
        self.sorting.insert(property.to_owned(), direction);
        self
    }

    pub fn limit(&self) -> Option<(u64, u64)> {
        self.limit
    }

    pub fn set_limit(&mut self, start: u64, amount: u64) -> &mut Self {
        self.limit = Some((start, amount));
        self
    }

    /// Applies the panel state on top of `config`: filters are appended,
    /// a chosen sorting replaces the config's, a limit sets start/amount.
    pub fn initialize(&self, config: &mut QueryConfig) {
        for filter in &self.filters {
            config.add_filter(filter.clone());
        }
        if !self.sorting.is_empty() {
            config.set_sorting(self.sorting.clone());
        }
        if let Some((start, amount)) = self.limit {
            config.set_start(start).set_amount(amount);
        }
    }
}
