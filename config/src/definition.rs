use serde::Deserialize;

#[derive(Deserialize)]
pub struct DefinitionConfig {
    name: String,
    data_providers: Vec<DataProviderConfig>,
}

impl DefinitionConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_providers(&self) -> &Vec<DataProviderConfig> {
        &self.data_providers
    }
}

#[derive(Deserialize)]
pub struct DataProviderConfig {
    name: String,
    table: String,
    #[serde(default)]
    initialization_data: Option<serde_json::Value>,
}

impl DataProviderConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn initialization_data(&self) -> &Option<serde_json::Value> {
        &self.initialization_data
    }
}
