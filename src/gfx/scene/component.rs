//! # Component Storage
//!
//! Type-indexed storage for the components attached to a [`Node`](super::Node).
//!
//! Any `'static` type can be a component. Components are grouped by their
//! [`TypeId`], so a query for one kind never has to look at the others. A node
//! may carry several components of the same kind; queries for a single
//! component return the first one that was added.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Heterogeneous bag of components keyed by component type.
#[derive(Default)]
pub struct Components {
    entries: HashMap<TypeId, Vec<Box<dyn Any>>>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component after any existing components of the same kind.
    pub fn add<T: Any>(&mut self, component: T) {
        self.entries
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Box::new(component));
    }

    /// Returns the first component of kind `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|list| list.first())
            .and_then(|component| component.downcast_ref::<T>())
    }

    /// Returns the first component of kind `T` mutably.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|list| list.first_mut())
            .and_then(|component| component.downcast_mut::<T>())
    }

    /// Iterates over every component of kind `T` in insertion order.
    pub fn iter<T: Any>(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries
            .get(&TypeId::of::<T>())
            .into_iter()
            .flatten()
            .filter_map(|component| component.downcast_ref::<T>())
    }

    /// Iterates mutably over every component of kind `T` in insertion order.
    pub fn iter_mut<T: Any>(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .into_iter()
            .flatten()
            .filter_map(|component| component.downcast_mut::<T>())
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.entries
            .get(&TypeId::of::<T>())
            .is_some_and(|list| !list.is_empty())
    }

    /// Removes and returns the first component of kind `T`.
    pub fn take<T: Any>(&mut self) -> Option<T> {
        let list = self.entries.get_mut(&TypeId::of::<T>())?;
        if list.is_empty() {
            return None;
        }
        let component = list.remove(0);
        if list.is_empty() {
            self.entries.remove(&TypeId::of::<T>());
        }
        component.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Removes every component of kind `T`, returning them in insertion order.
    pub fn remove_all<T: Any>(&mut self) -> Vec<T> {
        self.entries
            .remove(&TypeId::of::<T>())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|component| component.downcast::<T>().ok())
            .map(|boxed| *boxed)
            .collect()
    }

    /// Keeps only the components of kind `T` for which `keep` returns `true`.
    ///
    /// Components of other kinds are untouched.
    pub fn retain<T: Any>(&mut self, mut keep: impl FnMut(&T) -> bool) {
        let id = TypeId::of::<T>();
        if let Some(list) = self.entries.get_mut(&id) {
            list.retain(|component| component.downcast_ref::<T>().is_some_and(&mut keep));
            if list.is_empty() {
                self.entries.remove(&id);
            }
        }
    }

    /// Total number of components of all kinds.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Components {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Components")
            .field("len", &self.len())
            .finish()
    }
}
