use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::value::Value;

/// A model shared between collections and the environment. Identity is
/// reference identity, see [`Rc::ptr_eq`].
pub type ModelRef = Rc<RefCell<Model>>;

/// One record of a data provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    id: Option<i64>,
    provider_name: Option<String>,
    properties: IndexMap<String, Value>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(provider_name: &str) -> Self {
        Self {
            provider_name: Some(provider_name.to_owned()),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) -> &mut Self {
        self.id = Some(id);
        self
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider_name.as_deref()
    }

    pub fn set_provider_name(&mut self, provider_name: &str) -> &mut Self {
        self.provider_name = Some(provider_name.to_owned());
        self
    }

    /// `None` when the property is unset, `Some(Value::Null)` when it was
    /// explicitly set to null.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property<V: Into<Value>>(&mut self, name: &str, value: V) -> &mut Self {
        self.properties.insert(name.to_owned(), value.into());
        self
    }

    pub fn unset_property(&mut self, name: &str) -> Option<Value> {
        self.properties.shift_remove(name)
    }

    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// Compares the properties of `self` against `other`, ignoring `id`.
    /// Lists and maps must match by serialized form, scalars are compared
    /// loosely. Only the properties of `self` are walked, so a property
    /// present only on `other` does not make the models differ.
    pub fn same_properties(&self, other: &Model) -> bool {
        for (name, value) in &self.properties {
            if name == "id" {
                continue;
            }
            let other_value = other.property(name).unwrap_or(&Value::Null);
            if value.is_compound() {
                if !other_value.is_compound()
                    || value.serialize().ok() != other_value.serialize().ok()
                {
                    return false;
                }
            } else if !value.loose_eq(other_value) {
                return false;
            }
        }
        true
    }

    pub fn into_ref(self) -> ModelRef {
        Rc::new(RefCell::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_and_null_are_distinct() {
        let mut model = Model::with_provider("people");
        assert!(!model.has_properties());
        assert_eq!(model.property("name"), None);

        model.set_property("name", Value::Null);
        assert_eq!(model.property("name"), Some(&Value::Null));
        assert!(model.has_properties());

        assert_eq!(model.unset_property("name"), Some(Value::Null));
        assert!(!model.has_properties());
        assert_eq!(model.provider_name(), Some("people"));
    }

    #[test]
    fn property_order_is_kept() {
        let mut model = Model::new();
        model.set_property("b", 1).set_property("a", 2).set_property("b", 3);
        let names: Vec<&str> = model.properties().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn same_properties_ignores_id_and_coerces_scalars() {
        let mut first = Model::new();
        first.set_id(1).set_property("id", 1).set_property("age", 30);
        let mut second = Model::new();
        second.set_id(2).set_property("id", 2).set_property("age", "30");
        assert!(first.same_properties(&second));

        second.set_property("age", "31");
        assert!(!first.same_properties(&second));
    }

    #[test]
    fn same_properties_requires_lists_on_both_sides() {
        let mut first = Model::new();
        first.set_property("tags", vec![Value::from("a")]);
        let mut second = Model::new();
        second.set_property("tags", r#"["a"]"#);
        assert!(!first.same_properties(&second));

        second.set_property("tags", vec![Value::from("a")]);
        assert!(first.same_properties(&second));
    }

    #[test]
    fn same_properties_is_one_sided() {
        let first = Model::new();
        let mut second = Model::new();
        second.set_property("name", "Ann");
        assert!(first.same_properties(&second));
        assert!(!second.same_properties(&first));
    }
}
