use std::{any::Any, rc::Rc, sync::Arc};

use ahash::{HashMap, HashMapExt};
use dcg_data::{BaseConfig, Collection, DataDriver, DefaultDriver, ModelRef};
use dcg_db_sqlite::db::SqliteDb;
use dcg_error::{DcgError, Result};

use crate::{
    clipboard::Clipboard, definition::DataDefinition, panel::PanelContainer,
    translation::TranslationManager,
};

/// The request-scoped context handed to every component of a data
/// container: registered drivers, the definitions they come from and the
/// models currently being worked on.
pub struct Environment<D: DataDriver = DefaultDriver> {
    data_definition: Option<DataDefinition>,
    parent_data_definition: Option<DataDefinition>,
    drivers: HashMap<String, D>,
    current_model: Option<ModelRef>,
    current_collection: Option<Collection>,
    current_parent_collection: Option<Collection>,
    root_ids: Vec<i64>,
    panel_container: Option<PanelContainer>,
    clipboard: Option<Clipboard>,
    translation_manager: Option<Rc<dyn TranslationManager>>,
    controller: Option<Rc<dyn Any>>,
    view: Option<Rc<dyn Any>>,
}

impl<D: DataDriver> Environment<D> {
    pub fn new() -> Self {
        Self {
            data_definition: None,
            parent_data_definition: None,
            drivers: HashMap::new(),
            current_model: None,
            current_collection: None,
            current_parent_collection: None,
            root_ids: Vec::new(),
            panel_container: None,
            clipboard: None,
            translation_manager: None,
            controller: None,
            view: None,
        }
    }

    pub fn data_definition(&self) -> Option<&DataDefinition> {
        self.data_definition.as_ref()
    }

    pub fn set_data_definition(&mut self, definition: DataDefinition) -> &mut Self {
        self.data_definition = Some(definition);
        self
    }

    pub fn parent_data_definition(&self) -> Option<&DataDefinition> {
        self.parent_data_definition.as_ref()
    }

    pub fn set_parent_data_definition(&mut self, definition: DataDefinition) -> &mut Self {
        self.parent_data_definition = Some(definition);
        self
    }

    /// The driver registered as `source`, or without a source the one named
    /// after the data definition.
    pub fn data_driver(&self, source: Option<&str>) -> Option<&D> {
        let source = match source {
            Some(source) => source,
            None => self.data_definition.as_ref()?.name(),
        };
        self.drivers.get(source)
    }

    pub fn has_data_driver(&self, source: &str) -> bool {
        self.drivers.contains_key(source)
    }

    pub fn add_data_driver(&mut self, source: &str, driver: D) -> &mut Self {
        self.drivers.insert(source.to_owned(), driver);
        self
    }

    pub fn remove_data_driver(&mut self, source: &str) -> Option<D> {
        self.drivers.remove(source)
    }

    pub fn data_driver_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn current_model(&self) -> Option<&ModelRef> {
        self.current_model.as_ref()
    }

    pub fn set_current_model(&mut self, model: Option<ModelRef>) -> &mut Self {
        self.current_model = model;
        self
    }

    pub fn current_collection(&self) -> Option<&Collection> {
        self.current_collection.as_ref()
    }

    pub fn set_current_collection(&mut self, collection: Option<Collection>) -> &mut Self {
        self.current_collection = collection;
        self
    }

    pub fn current_parent_collection(&self) -> Option<&Collection> {
        self.current_parent_collection.as_ref()
    }

    pub fn set_current_parent_collection(&mut self, collection: Option<Collection>) -> &mut Self {
        self.current_parent_collection = collection;
        self
    }

    pub fn root_ids(&self) -> &Vec<i64> {
        &self.root_ids
    }

    pub fn set_root_ids(&mut self, root_ids: Vec<i64>) -> &mut Self {
        self.root_ids = root_ids;
        self
    }

    pub fn panel_container(&self) -> Option<&PanelContainer> {
        self.panel_container.as_ref()
    }

    pub fn set_panel_container(&mut self, panel_container: PanelContainer) -> &mut Self {
        self.panel_container = Some(panel_container);
        self
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    pub fn clipboard_mut(&mut self) -> Option<&mut Clipboard> {
        self.clipboard.as_mut()
    }

    pub fn set_clipboard(&mut self, clipboard: Clipboard) -> &mut Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn translation_manager(&self) -> Option<&Rc<dyn TranslationManager>> {
        self.translation_manager.as_ref()
    }

    pub fn set_translation_manager(&mut self, manager: Rc<dyn TranslationManager>) -> &mut Self {
        self.translation_manager = Some(manager);
        self
    }

    /// `None` when no controller is set or it is not a `T`.
    pub fn controller<T: Any>(&self) -> Option<Rc<T>> {
        self.controller.clone()?.downcast::<T>().ok()
    }

    pub fn set_controller<T: Any>(&mut self, controller: Rc<T>) -> &mut Self {
        self.controller = Some(controller);
        self
    }

    /// `None` when no view is set or it is not a `T`.
    pub fn view<T: Any>(&self) -> Option<Rc<T>> {
        self.view.clone()?.downcast::<T>().ok()
    }

    pub fn set_view<T: Any>(&mut self, view: Rc<T>) -> &mut Self {
        self.view = Some(view);
        self
    }
}

impl<D: DataDriver> Default for Environment<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment<DefaultDriver> {
    /// Registers one driver per data provider of the data definition and
    /// of the parent definition. Providers already registered are kept.
    /// A provider without a `source` in its initialization data reads its
    /// own table; every driver acts on behalf of `user_id`.
    pub fn register_providers(&mut self, db: &Arc<SqliteDb>, user_id: &i64) -> Result<&mut Self> {
        let Some(definition) = &self.data_definition else {
            let msg = "Environment has no data definition to register providers from.";
            dcg_log::error(Some("❌"), msg);
            return Err(DcgError::configuration(msg));
        };

        let informations: Vec<_> = definition
            .data_providers()
            .iter()
            .chain(
                self.parent_data_definition
                    .iter()
                    .flat_map(|parent| parent.data_providers().iter()),
            )
            .cloned()
            .collect();

        for information in informations {
            if self.drivers.contains_key(information.name()) {
                continue;
            }

            let mut config = match information.initialization_data() {
                Some(data) => BaseConfig::from_json(data)?,
                None => BaseConfig::default(),
            };
            if config.source().is_none() {
                config.set_source(information.table_name());
            }
            config.set_user_id(user_id);

            let mut driver = DefaultDriver::new(Arc::clone(db));
            driver.set_base_config(config)?;

            dcg_log::info(
                Some("🔌"),
                format!(
                    "[Environment] Registered data provider {} on table {}",
                    information.name(),
                    driver.source()?
                ),
            );
            self.drivers.insert(information.name().to_owned(), driver);
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use dcg_data::{Model, QueryConfig};

    use super::*;
    use crate::translation::StaticTranslationManager;

    struct FakeDriver {
        name: String,
    }

    impl DataDriver for FakeDriver {
        fn set_base_config(&mut self, config: BaseConfig) -> Result<()> {
            self.name = config.source().unwrap_or_default().to_owned();
            Ok(())
        }

        fn empty_model(&self) -> Model {
            Model::with_provider(&self.name)
        }

        async fn fetch(&self, _: &QueryConfig) -> Result<Option<Model>> {
            Ok(None)
        }

        async fn fetch_all(&self, _: &QueryConfig) -> Result<dcg_data::Fetched> {
            Ok(dcg_data::Fetched::Ids(Vec::new()))
        }

        async fn filter_options(&self, _: &QueryConfig) -> Result<Collection> {
            Ok(Collection::new())
        }

        async fn count(&self, _: &QueryConfig) -> Result<i64> {
            Ok(0)
        }

        async fn is_unique_value(&self, _: &str, _: &dcg_data::Value, _: Option<i64>) -> Result<bool> {
            Ok(true)
        }

        async fn reset_fallback(&self, _: &str) -> Result<()> {
            Ok(())
        }

        async fn save(&self, model: &mut Model) -> Result<i64> {
            Ok(model.id().unwrap_or(1))
        }

        async fn save_each(&self, _: &Collection) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _: dcg_data::DeleteTarget<'_>) -> Result<()> {
            Ok(())
        }

        async fn field_exists(&self, _: &str) -> Result<bool> {
            Ok(false)
        }

        async fn save_version(&self, _: &Model, _: &str) -> Result<i64> {
            Ok(1)
        }

        async fn set_version_active(&self, _: i64, _: i64) -> Result<()> {
            Ok(())
        }

        async fn version(&self, _: i64, _: i64) -> Result<Option<Model>> {
            Ok(None)
        }

        async fn versions(&self, _: i64, _: bool) -> Result<Collection> {
            Ok(Collection::new())
        }

        async fn active_version(&self, _: i64) -> Result<Option<i64>> {
            Ok(None)
        }
    }

    fn fake(name: &str) -> FakeDriver {
        FakeDriver {
            name: name.to_owned(),
        }
    }

    struct ListController {
        title: &'static str,
    }

    #[test]
    fn default_driver_follows_definition_name() {
        let mut environment: Environment<FakeDriver> = Environment::new();
        environment
            .add_data_driver("people", fake("people"))
            .add_data_driver("pets", fake("pets"));
        assert!(environment.data_driver(None).is_none());

        environment.set_data_definition(DataDefinition::new("pets"));
        assert_eq!(
            environment.data_driver(None).map(|d| d.empty_model()),
            Some(Model::with_provider("pets"))
        );
        assert!(environment.data_driver(Some("people")).is_some());
        assert_eq!(environment.data_driver_names(), vec!["people", "pets"]);

        assert!(environment.remove_data_driver("pets").is_some());
        assert!(environment.data_driver(None).is_none());
        assert!(!environment.has_data_driver("pets"));
    }

    #[test]
    fn controller_and_view_downcast() {
        let mut environment: Environment<FakeDriver> = Environment::default();
        assert!(environment.controller::<ListController>().is_none());

        environment
            .set_controller(Rc::new(ListController { title: "People" }))
            .set_view(Rc::new(RefCell::new(vec!["row"])));

        assert_eq!(
            environment.controller::<ListController>().map(|c| c.title),
            Some("People")
        );
        assert!(environment.controller::<String>().is_none());
        assert_eq!(
            environment
                .view::<RefCell<Vec<&'static str>>>()
                .map(|view| view.borrow().len()),
            Some(1)
        );
    }

    #[test]
    fn current_state_is_shared() {
        let mut environment: Environment<FakeDriver> = Environment::new();
        let mut model = Model::new();
        model.set_property("name", "Ann");
        let model = model.into_ref();
        let mut collection = Collection::new();
        collection.push(model.clone());

        environment
            .set_current_model(Some(model.clone()))
            .set_current_collection(Some(collection))
            .set_root_ids(vec![1, 2])
            .set_clipboard(Clipboard::new())
            .set_panel_container(PanelContainer::new());

        model.borrow_mut().set_property("name", "Bob");
        let current = environment.current_collection().and_then(|c| c.get(0)).unwrap();
        assert!(Rc::ptr_eq(&current, &model));
        assert_eq!(environment.root_ids(), &vec![1, 2]);
        assert!(environment.current_parent_collection().is_none());

        environment.clipboard_mut().unwrap().copy(vec![3]);
        assert_eq!(environment.clipboard().map(|c| c.ids().len()), Some(1));
    }

    #[test]
    fn translation_manager_is_shared() {
        let mut manager = StaticTranslationManager::new();
        manager.insert(None, "new", "Neu");

        let mut environment: Environment<FakeDriver> = Environment::new();
        environment.set_translation_manager(Rc::new(manager));
        assert_eq!(
            environment
                .translation_manager()
                .and_then(|manager| manager.translate("new", None)),
            Some("Neu".to_owned())
        );
    }
}
