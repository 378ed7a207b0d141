use std::{cmp::Ordering, rc::Rc, slice::Iter};

use crate::model::{Model, ModelRef};

/// An ordered sequence of shared models. Positions are always contiguous,
/// removals shift every following model down by one.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    models: Vec<ModelRef>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ModelRef> {
        self.models.get(index).cloned()
    }

    /// Appends `model` unless it has no properties.
    pub fn push(&mut self, model: ModelRef) -> &mut Self {
        if model.borrow().has_properties() {
            self.models.push(model);
        }
        self
    }

    /// Prepends `model` unless it has no properties.
    pub fn unshift(&mut self, model: ModelRef) -> &mut Self {
        if model.borrow().has_properties() {
            self.models.insert(0, model);
        }
        self
    }

    pub fn pop(&mut self) -> Option<ModelRef> {
        self.models.pop()
    }

    pub fn shift(&mut self) -> Option<ModelRef> {
        if self.models.is_empty() {
            return None;
        }
        Some(self.models.remove(0))
    }

    /// Places `model` at `index`. An index past the end appends. Models
    /// without properties are ignored.
    pub fn insert(&mut self, index: usize, model: ModelRef) -> &mut Self {
        if model.borrow().has_properties() {
            let index = index.min(self.models.len());
            self.models.insert(index, model);
        }
        self
    }

    pub fn remove(&mut self, index: usize) -> Option<ModelRef> {
        if index < self.models.len() {
            Some(self.models.remove(index))
        } else {
            None
        }
    }

    /// Drops every occurrence of `model`. Returns how many were removed.
    pub fn remove_model(&mut self, model: &ModelRef) -> usize {
        let before = self.models.len();
        self.models.retain(|item| !Rc::ptr_eq(item, model));
        before - self.models.len()
    }

    /// Returns a reversed copy. The models stay shared with `self`.
    pub fn reverse(&self) -> Self {
        let mut models = self.models.clone();
        models.reverse();
        Self { models }
    }

    /// Returns a sorted copy. The sort is stable and the models stay shared
    /// with `self`.
    pub fn sort<F>(&self, mut compare: F) -> Self
    where
        F: FnMut(&Model, &Model) -> Ordering,
    {
        let mut models = self.models.clone();
        models.sort_by(|a, b| compare(&a.borrow(), &b.borrow()));
        Self { models }
    }

    pub fn iter(&self) -> Iter<'_, ModelRef> {
        self.models.iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a ModelRef;
    type IntoIter = Iter<'a, ModelRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}

impl FromIterator<ModelRef> for Collection {
    fn from_iter<T: IntoIterator<Item = ModelRef>>(iter: T) -> Self {
        let mut collection = Self::new();
        for model in iter {
            collection.push(model);
        }
        collection
    }
}
