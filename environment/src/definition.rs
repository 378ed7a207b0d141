/// Which data providers a definition reads from, and the table behind each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataDefinition {
    name: String,
    data_providers: Vec<DataProviderInformation>,
}

impl DataDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            data_providers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_providers(&self) -> &Vec<DataProviderInformation> {
        &self.data_providers
    }

    pub fn data_provider(&self, name: &str) -> Option<&DataProviderInformation> {
        self.data_providers
            .iter()
            .find(|information| information.name() == name)
    }

    /// Replaces an already known provider of the same name.
    pub fn add_data_provider(&mut self, information: DataProviderInformation) -> &mut Self {
        match self
            .data_providers
            .iter_mut()
            .find(|known| known.name() == information.name())
        {
            Some(known) => *known = information,
            None => self.data_providers.push(information),
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataProviderInformation {
    name: String,
    table_name: String,
    initialization_data: Option<serde_json::Value>,
}

impl DataProviderInformation {
    pub fn new(name: &str, table_name: &str) -> Self {
        Self {
            name: name.to_owned(),
            table_name: table_name.to_owned(),
            initialization_data: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn initialization_data(&self) -> Option<&serde_json::Value> {
        self.initialization_data.as_ref()
    }

    pub fn set_initialization_data(&mut self, data: serde_json::Value) -> &mut Self {
        self.initialization_data = Some(data);
        self
    }
}
